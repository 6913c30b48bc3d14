//! Reading a picked file into an `UploadFile`.

#[cfg(test)]
#[path = "file_test.rs"]
mod file_test;

/// Content type to send, treating the browser's empty string as unknown.
#[cfg(any(test, feature = "hydrate"))]
pub fn content_type(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_owned()) }
}

/// Read the first file of an `<input type="file">`, if one is chosen.
///
/// # Errors
///
/// Returns a message when the browser refuses to read the file.
#[cfg(feature = "hydrate")]
pub async fn read_selected(input: &web_sys::HtmlInputElement) -> Result<Option<gallery::UploadFile>, String> {
    let Some(file) = input.files().and_then(|files| files.get(0)) else {
        return Ok(None);
    };
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("could not read {}: {e:?}", file.name()))?;
    Ok(Some(gallery::UploadFile {
        name: file.name(),
        content_type: content_type(&file.type_()),
        bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
    }))
}
