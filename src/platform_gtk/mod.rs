use gtk4 as gtk;
use gtk4::prelude::GtkWindowExt;

use crate::api::FullscreenHost;
use crate::error::ChartResult;

/// Fullscreen capability backed by the application's top-level window.
#[derive(Debug, Clone)]
pub struct GtkFullscreenHost {
    window: gtk::Window,
}

impl GtkFullscreenHost {
    #[must_use]
    pub fn new(window: gtk::Window) -> Self {
        Self { window }
    }

    #[must_use]
    pub fn window(&self) -> &gtk::Window {
        &self.window
    }
}

impl FullscreenHost for GtkFullscreenHost {
    fn is_fullscreen(&self) -> bool {
        self.window.is_fullscreen()
    }

    fn enter_fullscreen(&mut self) -> ChartResult<()> {
        self.window.fullscreen();
        Ok(())
    }

    fn exit_fullscreen(&mut self) -> ChartResult<()> {
        self.window.unfullscreen();
        Ok(())
    }
}
