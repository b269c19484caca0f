//! Wayland side of the session: one connection, the `wl_compositor`
//! global, and at most one `wl_surface` wrapped in a `wl_egl_window`.

use glinfo_negotiate::{NativeDisplay, NativeWindow};
use glinfo_session::{Platform, PlatformError};
use tracing::{debug, info};
use wayland_client::{
    Connection, EventQueue, Proxy, delegate_noop,
    globals::{GlobalListContents, registry_queue_init},
    protocol::{wl_compositor, wl_registry, wl_surface},
};
use wayland_egl::WlEglSurface;

/// Highest `wl_compositor` version this client speaks.
const COMPOSITOR_VERSION: u32 = 4;

#[derive(Debug, Default)]
struct State;

impl wayland_client::Dispatch<wl_registry::WlRegistry, GlobalListContents> for State {
    fn event(
        _state: &mut Self,
        _proxy: &wl_registry::WlRegistry,
        _event: wl_registry::Event,
        _data: &GlobalListContents,
        _conn: &Connection,
        _qhandle: &wayland_client::QueueHandle<Self>,
    ) {
        // Globals are tracked by registry_queue_init.
    }
}

delegate_noop!(State: wl_compositor::WlCompositor);
delegate_noop!(State: ignore wl_surface::WlSurface);

struct Live {
    connection: Connection,
    queue: EventQueue<State>,
    state: State,
    compositor: wl_compositor::WlCompositor,
}

struct Window {
    // Declared first: the wl_egl_window must go before its wl_surface.
    egl: WlEglSurface,
    surface: wl_surface::WlSurface,
}

/// Connection to the compositor named by `WAYLAND_DISPLAY`.
pub struct WaylandPlatform {
    live: Option<Live>,
    window: Option<Window>,
}

impl WaylandPlatform {
    /// Connect, round-trip the registry, and bind `wl_compositor`.
    pub fn connect() -> Result<Self, PlatformError> {
        let connection =
            Connection::connect_to_env().map_err(|e| PlatformError::Connect(e.to_string()))?;

        let (globals, queue) = registry_queue_init::<State>(&connection)
            .map_err(|e| PlatformError::Roundtrip(e.to_string()))?;

        let compositor = globals
            .bind::<wl_compositor::WlCompositor, _, _>(&queue.handle(), 1..=COMPOSITOR_VERSION, ())
            .map_err(|e| {
                debug!("wl_compositor bind failed: {e}");
                PlatformError::MissingGlobal("wl_compositor")
            })?;

        info!(version = compositor.version(), "connected to Wayland compositor");
        Ok(Self {
            live: Some(Live {
                connection,
                queue,
                state: State,
                compositor,
            }),
            window: None,
        })
    }

    pub fn is_connected(&self) -> bool {
        self.live.is_some()
    }

    pub fn has_window(&self) -> bool {
        self.window.is_some()
    }
}

impl Platform for WaylandPlatform {
    fn native_display(&self) -> NativeDisplay {
        match &self.live {
            Some(live) => NativeDisplay::from_ptr(live.connection.backend().display_ptr()),
            None => NativeDisplay::NONE,
        }
    }

    fn create_window(&mut self, width: i32, height: i32) -> Result<NativeWindow, PlatformError> {
        let live = self
            .live
            .as_mut()
            .ok_or_else(|| PlatformError::Window("not connected".into()))?;
        if let Some(window) = &self.window {
            return Ok(NativeWindow::from_ptr(window.egl.ptr().cast_mut()));
        }

        let surface = live.compositor.create_surface(&live.queue.handle(), ());
        let egl = match WlEglSurface::new(surface.id(), width, height) {
            Ok(egl) => egl,
            Err(e) => {
                surface.destroy();
                return Err(PlatformError::Window(e.to_string()));
            }
        };
        let native = NativeWindow::from_ptr(egl.ptr().cast_mut());
        self.window = Some(Window { egl, surface });

        live.queue
            .roundtrip(&mut live.state)
            .map_err(|e| PlatformError::Roundtrip(e.to_string()))?;
        debug!(width, height, "created wl_egl_window");
        Ok(native)
    }

    fn destroy_window(&mut self) {
        let Some(Window { egl, surface }) = self.window.take() else {
            return;
        };
        drop(egl);
        surface.destroy();
        if let Some(live) = &self.live {
            if let Err(e) = live.connection.flush() {
                debug!("flush after surface destroy: {e}");
            }
        }
        debug!("destroyed wl_egl_window");
    }

    fn disconnect(&mut self) {
        self.destroy_window();
        if let Some(live) = self.live.take() {
            if let Err(e) = live.connection.flush() {
                debug!("flush on disconnect: {e}");
            }
            debug!("disconnected from Wayland compositor");
        }
    }
}

impl Drop for WaylandPlatform {
    fn drop(&mut self) {
        self.disconnect();
    }
}
