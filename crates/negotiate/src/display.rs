use glinfo_common::{CapabilitySource, ErrorDomain};

use crate::egl::{EglApi, EglDisplay};

/// String queries against an initialized EGL display.
pub struct DisplayStrings<'a, E: EglApi + ?Sized> {
    egl: &'a E,
    display: EglDisplay,
}

impl<'a, E: EglApi + ?Sized> DisplayStrings<'a, E> {
    pub fn new(egl: &'a E, display: EglDisplay) -> Self {
        Self { egl, display }
    }
}

impl<E: EglApi + ?Sized> CapabilitySource for DisplayStrings<'_, E> {
    fn domain(&self) -> ErrorDomain {
        ErrorDomain::Egl
    }

    fn query_string(&self, key: u32) -> Option<String> {
        let name = i32::try_from(key).ok()?;
        self.egl.query_string(self.display, name)
    }

    fn take_error(&self) -> u32 {
        self.egl.get_error() as u32
    }
}
