use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use std::future::Future;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

#[rustfmt::skip]
use web_sys::{
    CanvasRenderingContext2d,
    Document,
    HtmlCanvasElement,
    Response,
    Window,
};

// On wasm the macros write to the browser console, natively (tests) to stdout/stderr
#[cfg(target_arch = "wasm32")]
macro_rules! log {
    ($($t:tt)*) => {
        web_sys::console::log_1(&format!($($t)*).into())
    }
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log {
    ($($t:tt)*) => {
        println!($($t)*)
    }
}

#[cfg(target_arch = "wasm32")]
macro_rules! error {
    ($($t:tt)*) => {
        web_sys::console::error_1(&format!($($t)*).into())
    }
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! error {
    ($($t:tt)*) => {
        eprintln!($($t)*)
    }
}

// ==================== Constants ====================
// Constants related to HTML elements
pub mod html {
    pub const FOREGROUND_ID: &str = "foreground";
    pub const UI_ID: &str = "UI";
    pub const CONTEXT_2D: &str = "2d";
}

pub type LoopClosure = Closure<dyn FnMut(f64)>;

/// Client-space rectangle of an element, as reported by `getBoundingClientRect`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

pub fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| anyhow!("Window not found"))
}

pub fn document() -> Result<Document> {
    window()?
        .document()
        .ok_or_else(|| anyhow!("No Document Found"))
}

pub fn canvas(id: &str) -> Result<HtmlCanvasElement> {
    document()?
        .get_element_by_id(id)
        .ok_or_else(|| anyhow!("No Canvas Element found with ID : '{}'", id))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|element| anyhow!("Error converting {:#?} to HtmlCanvasElement", element))
}

pub fn context(id: &str) -> Result<CanvasRenderingContext2d> {
    canvas(id)?
        .get_context(html::CONTEXT_2D)
        // get_context returns Result<Option<Object>, JsValue>
        // - the JsValue error is mapped into anyhow
        // - the None case becomes an error of its own
        .map_err(|js_value| anyhow!("Error getting context : {:#?}", js_value))?
        .ok_or_else(|| anyhow!("No 2d context found on '{}'", id))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|element| {
            anyhow!(
                "Error converting {:#?} to CanvasRenderingContext2d",
                element
            )
        })
}

pub fn resize_canvas(id: &str, width: f64, height: f64) -> Result<()> {
    let canvas = canvas(id)?;
    canvas.set_width(width.max(0.0) as u32);
    canvas.set_height(height.max(0.0) as u32);
    Ok(())
}

pub fn set_cursor(id: &str, cursor: &str) -> Result<()> {
    canvas(id)?
        .style()
        .set_property("cursor", cursor)
        .map_err(|err| anyhow!("Could not set cursor on '{}' : {:#?}", id, err))
}

pub fn bounds(canvas: &HtmlCanvasElement) -> Bounds {
    let rect = canvas.get_bounding_client_rect();
    Bounds {
        left: rect.left(),
        top: rect.top(),
        right: rect.right(),
        bottom: rect.bottom(),
    }
}

/// Inner size of the browser window in CSS pixels
pub fn inner_size() -> Result<(f64, f64)> {
    let window = window()?;
    let width = window
        .inner_width()
        .map_err(|err| anyhow!("Could not read window width : {:#?}", err))?
        .as_f64()
        .ok_or_else(|| anyhow!("Window width is not a number"))?;
    let height = window
        .inner_height()
        .map_err(|err| anyhow!("Could not read window height : {:#?}", err))?
        .as_f64()
        .ok_or_else(|| anyhow!("Window height is not a number"))?;
    Ok((width, height))
}

pub fn now() -> Result<f64> {
    Ok(window()?
        .performance()
        .ok_or_else(|| anyhow!("Performance object not found"))?
        .now())
}

pub fn create_raf_closure(f: impl FnMut(f64) + 'static) -> LoopClosure {
    Closure::wrap(Box::new(f) as Box<dyn FnMut(f64)>)
}

pub fn request_animation_frame(callback: &LoopClosure) -> Result<i32> {
    window()?
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .map_err(|err| anyhow!("Cannot request animation frame : {:#?}", err))
}

pub fn spawn_local<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(future);
}

pub async fn fetch_json<T>(json_path: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let resp_value = fetch_with_str(json_path).await?;
    let resp: Response = resp_value
        .dyn_into()
        .map_err(|element| anyhow!("error converting [{:#?}] to Response", element))?;
    if !resp.ok() {
        return Err(anyhow!(
            "fetching [{}] failed with status {}",
            json_path,
            resp.status()
        ));
    }
    let json = resp
        .json()
        .map_err(|err| anyhow!("Could not get JSON from response [{:#?}]", err))?;

    let json_value = JsFuture::from(json)
        .await
        .map_err(|err| anyhow!("error fetching [{:#?}]", err))?;

    serde_wasm_bindgen::from_value(json_value)
        .map_err(|err| anyhow!("error converting response : {:#?}", err))
}

async fn fetch_with_str(resource: &str) -> Result<JsValue> {
    let resp = window()?.fetch_with_str(resource);

    JsFuture::from(resp)
        .await
        .map_err(|err| anyhow!("error fetching : {:#?}", err))
}
