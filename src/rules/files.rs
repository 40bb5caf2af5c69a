use crate::registry::RuleResult;
use crate::{Arg, EvaluationContext, FieldValue, FileInfo};

/// The declared mime type, or one guessed from the file extension.
fn file_mime(file: &FileInfo) -> Option<String> {
    match &file.mime {
        Some(declared) if !declared.is_empty() => Some(declared.to_ascii_lowercase()),
        _ => mime_guess::from_path(&file.name)
            .first_raw()
            .map(str::to_owned),
    }
}

fn allowed(mime: &str, accepted: &[String]) -> bool {
    accepted.iter().any(|a| match a.strip_suffix("/*") {
        Some(top) => mime.split('/').next() == Some(top),
        None => a == mime,
    })
}

/// Every file's type must be in the argument list. `image/*` style entries
/// accept a whole top-level type. Values that are not file lists pass.
pub(super) fn mime(value: &FieldValue, args: &[Arg], _: &EvaluationContext<'_>) -> RuleResult {
    let FieldValue::Files(files) = value else {
        return Ok(true);
    };
    let accepted: Vec<String> = args
        .iter()
        .map(|a| a.as_text().trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    Ok(files
        .iter()
        .all(|f| file_mime(f).is_some_and(|m| allowed(&m, &accepted))))
}
