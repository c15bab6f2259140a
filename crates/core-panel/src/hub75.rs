//! Physical HUB75E chain behind the `rpi-led-matrix` bindings.
//!
//! Double-buffered: pixels land on an offscreen canvas that is swapped in on
//! vsync, so `present` is atomic from the viewer's perspective.

use crate::{Panel, PanelError};
use core_config::PanelConfig;
use core_model::{Frame, PANEL_HEIGHT, PANEL_WIDTH};
use rpi_led_matrix::{LedCanvas, LedColor, LedMatrix, LedMatrixOptions, LedRuntimeOptions};
use std::sync::Mutex;
use tracing::{info, warn};

struct MatrixState {
    matrix: LedMatrix,
    offscreen: Option<LedCanvas>,
}

pub struct Hub75Panel {
    state: Mutex<MatrixState>,
}

impl Hub75Panel {
    /// Bring up the chain. GPIO access requires root (or the gpio group);
    /// failure here is fatal at startup outside mock mode.
    pub fn open(config: &PanelConfig) -> Result<Self, PanelError> {
        if !crate::expects_single_module(config.matrix_rows, config.matrix_cols) {
            warn!(
                target: "panel.hub75",
                rows = config.matrix_rows,
                cols = config.matrix_cols,
                "unexpected_module_geometry"
            );
        }

        let mut options = LedMatrixOptions::new();
        options.set_rows(config.matrix_rows);
        options.set_cols(config.matrix_cols);
        options.set_hardware_mapping(config.hardware_mapping.as_str());
        options.set_chain_length(config.chain_length);
        options.set_parallel(config.parallel_chains);
        // knobs arrive clamped into the driver's accepted ranges
        let _ = options.set_brightness(config.brightness.max(1) as u8);
        let _ = options.set_pwm_bits(config.pwm_bits as u8);

        let mut runtime = LedRuntimeOptions::new();
        runtime.set_gpio_slowdown(config.gpio_slowdown);

        let matrix = LedMatrix::new(Some(options), Some(runtime))
            .map_err(|e| PanelError::HardwareInit(e.to_string()))?;
        let offscreen = matrix.offscreen_canvas();
        info!(
            target: "panel.hub75",
            mapping = config.hardware_mapping.as_str(),
            brightness = config.brightness,
            "matrix_initialized"
        );
        Ok(Self {
            state: Mutex::new(MatrixState {
                matrix,
                offscreen: Some(offscreen),
            }),
        })
    }
}

impl Panel for Hub75Panel {
    fn present(&self, frame: &Frame) {
        let mut state = self.state.lock().expect("hub75 state poisoned");
        let Some(mut canvas) = state.offscreen.take() else {
            // Canvas lost to a previous fault; nothing to draw on.
            warn!(target: "panel.hub75", "present_skipped_no_canvas");
            return;
        };
        for y in 0..PANEL_HEIGHT {
            for x in 0..PANEL_WIDTH {
                let px = frame.get(x, y).unwrap_or(core_model::Rgb::BLACK);
                canvas.set(
                    x,
                    y,
                    &LedColor {
                        red: px.r,
                        green: px.g,
                        blue: px.b,
                    },
                );
            }
        }
        state.offscreen = Some(state.matrix.swap(canvas));
    }

    fn clear(&self) {
        self.present(&Frame::black());
    }
}
