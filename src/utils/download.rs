// ============================================================================
// DOWNLOAD - Descarga de binarios en el navegador (Blob + anchor click)
// ============================================================================

use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

/// Nombre del PDF de hoja de ruta para una fecha "YYYY-MM-DD"
pub fn route_pdf_filename(date: &str) -> String {
    format!("delivery-route-{}.pdf", date)
}

/// Dispara la descarga de un binario creando un Blob y clickando un <a>
pub fn save_binary(bytes: &[u8], filename: &str, mime_type: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("No window available")?;
    let document = window.document().ok_or("No document available")?;

    let array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::new();
    parts.push(&array.buffer());

    let options = BlobPropertyBag::new();
    options.set_type(mime_type);
    let blob = Blob::new_with_buffer_source_sequence_and_options(&parts, &options)
        .map_err(|e| format!("Blob error: {:?}", e))?;

    let url = Url::create_object_url_with_blob(&blob)
        .map_err(|e| format!("Object URL error: {:?}", e))?;

    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(|e| format!("DOM error: {:?}", e))?
        .dyn_into()
        .map_err(|_| "Anchor cast failed".to_string())?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();

    // Liberar la URL del blob una vez disparada la descarga
    let _ = Url::revoke_object_url(&url);

    log::info!("📄 Descarga disparada: {}", filename);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn el_pdf_de_ruta_lleva_la_fecha() {
        assert_eq!(route_pdf_filename("2025-03-10"), "delivery-route-2025-03-10.pdf");
    }
}
