//! WASM bindings for the mathlines editor.
//!
//! Provides an embeddable multi-line math input for JavaScript/TypeScript
//! apps. The host owns the list of expressions; the editor reports every
//! edit through `onChange` and accepts new lists through `setEquations`.

mod editor;
mod types;

pub use editor::*;
pub use types::*;

use wasm_bindgen::prelude::*;

/// Initialize panic hook and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    #[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
    {
        use tracing::Level;
        use tracing::subscriber::set_global_default;
        use tracing_subscriber::Registry;
        use tracing_subscriber::layer::SubscriberExt;

        let console_level = if cfg!(debug_assertions) {
            Level::DEBUG
        } else {
            Level::INFO
        };

        let wasm_layer = tracing_wasm::WASMLayer::new(
            tracing_wasm::WASMLayerConfigBuilder::new()
                .set_max_level(console_level)
                .build(),
        );

        // A host that already installed a subscriber keeps it.
        let _ = set_global_default(Registry::default().with(wasm_layer));
    }
}
