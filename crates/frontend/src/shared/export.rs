//! Сохранение файлов, полученных с сервера
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

fn js_err(context: &'static str) -> impl Fn(JsValue) -> String {
    move |e| format!("{}: {:?}", context, e)
}

/// Отдаёт бинарный ответ браузеру как скачиваемый файл
pub fn download_bytes(bytes: &[u8], filename: &str, mime: &str) -> Result<(), String> {
    if bytes.is_empty() {
        return Err("Сервер вернул пустой файл".to_string());
    }

    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
    let options = BlobPropertyBag::new();
    options.set_type(mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(js_err("Failed to create blob"))?;

    let url = Url::create_object_url_with_blob(&blob).map_err(js_err("Failed to create object URL"))?;
    let result = click_download_link(&url, filename);
    // Ссылку освобождаем и при ошибке клика
    let _ = Url::revoke_object_url(&url);
    result
}

/// Временный `<a download>` в body: клик и удаление
fn click_download_link(url: &str, filename: &str) -> Result<(), String> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("No document object")?;
    let body = document.body().ok_or("No body element")?;

    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(js_err("Failed to create anchor"))?
        .unchecked_into();
    anchor.set_href(url);
    anchor.set_download(filename);
    anchor
        .style()
        .set_property("display", "none")
        .map_err(js_err("Failed to hide anchor"))?;

    body.append_child(&anchor)
        .map_err(js_err("Failed to append anchor"))?;
    anchor.click();
    body.remove_child(&anchor)
        .map_err(js_err("Failed to remove anchor"))?;
    Ok(())
}
