// ============================================================================
// PUSH CHANNEL - Eventos push del backend via WebSocket
// ============================================================================
// Entrega eventos `order-updated` (con flag opcional de borrado) y
// `customer-updated`. La conexión se registra UNA sola vez; llamadas
// duplicadas a connect() se ignoran (mismo patrón que los listeners
// globales de window).
// ============================================================================

use std::rc::Rc;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{MessageEvent, WebSocket};
use crate::config::CONFIG;
use crate::models::push::PushEvent;

pub struct PushChannel {
    socket: Option<WebSocket>,
    // Flag para prevenir conexiones duplicadas
    connected: Rc<RefCell<bool>>,
}

/// Deriva la URL del WebSocket a partir de la URL HTTP del backend
pub fn websocket_url(backend_url: &str) -> String {
    let ws_base = if let Some(rest) = backend_url.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = backend_url.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        format!("ws://{}", backend_url)
    };
    format!("{}/ws", ws_base.trim_end_matches('/'))
}

/// Parsea el JSON de un mensaje push; None para eventos desconocidos
pub fn parse_push_message(raw: &str) -> Option<PushEvent> {
    match serde_json::from_str::<PushEvent>(raw) {
        Ok(event) => Some(event),
        Err(e) => {
            log::warn!("⚠️ Mensaje push no reconocido: {} ({})", raw, e);
            None
        }
    }
}

impl PushChannel {
    pub fn new() -> Self {
        Self {
            socket: None,
            connected: Rc::new(RefCell::new(false)),
        }
    }

    /// Abre el WebSocket y entrega cada evento parseado al callback.
    /// Solo se conecta una vez; llamadas posteriores se ignoran.
    pub fn connect<F>(&mut self, on_event: F) -> Result<(), String>
    where
        F: Fn(PushEvent) + 'static,
    {
        {
            let mut connected = self.connected.borrow_mut();
            if *connected {
                log::warn!("⚠️ PushChannel: connect() ya fue llamado, ignorando llamada duplicada");
                return Ok(());
            }
            *connected = true;
        }

        let url = websocket_url(CONFIG.backend_url());
        log::info!("📡 Conectando canal push: {}", url);

        let socket = WebSocket::new(&url)
            .map_err(|e| format!("WebSocket error: {:?}", e))?;

        let on_message = Closure::wrap(Box::new(move |event: MessageEvent| {
            if let Some(text) = event.data().as_string() {
                if let Some(push_event) = parse_push_message(&text) {
                    on_event(push_event);
                }
            }
        }) as Box<dyn FnMut(MessageEvent)>);
        socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        // forget() mantiene vivo el closure durante toda la vida de la app
        on_message.forget();

        let on_open = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            log::info!("✅ Canal push conectado");
        }) as Box<dyn FnMut(web_sys::Event)>);
        socket.set_onopen(Some(on_open.as_ref().unchecked_ref()));
        on_open.forget();

        let connected_flag = self.connected.clone();
        let on_close = Closure::wrap(Box::new(move |_event: web_sys::CloseEvent| {
            log::warn!("📴 Canal push desconectado");
            *connected_flag.borrow_mut() = false;
        }) as Box<dyn FnMut(web_sys::CloseEvent)>);
        socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));
        on_close.forget();

        self.socket = Some(socket);
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        *self.connected.borrow()
    }

    /// Cierra el socket (teardown en unmount)
    pub fn close(&mut self) {
        if let Some(socket) = self.socket.take() {
            let _ = socket.close();
            *self.connected.borrow_mut() = false;
        }
    }
}

impl Default for PushChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::push::PushEvent;

    #[test]
    fn websocket_url_respeta_el_esquema() {
        assert_eq!(websocket_url("http://localhost:5001"), "ws://localhost:5001/ws");
        assert_eq!(
            websocket_url("https://api.magicroute.co.uk"),
            "wss://api.magicroute.co.uk/ws"
        );
        assert_eq!(websocket_url("https://api.example.com/"), "wss://api.example.com/ws");
    }

    #[test]
    fn mensajes_desconocidos_se_descartan() {
        assert!(parse_push_message("{\"event\":\"something-else\"}").is_none());
        assert!(parse_push_message("not json").is_none());
    }

    #[test]
    fn mensaje_de_pedido_parsea() {
        let event = parse_push_message(r#"{"event":"order-updated","data":{"orderId":"1"}}"#);
        assert!(matches!(event, Some(PushEvent::OrderUpdated(_))));
    }
}
