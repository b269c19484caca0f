//! Raw EGL and GL enum values used by the negotiation and report paths.

/// EGL enums (EGL 1.5 core plus the platform extensions we query).
pub mod egl {
    pub const NONE: i32 = 0x3038;

    pub const SUCCESS: i32 = 0x3000;
    pub const NOT_INITIALIZED: i32 = 0x3001;
    pub const BAD_ACCESS: i32 = 0x3002;
    pub const BAD_ALLOC: i32 = 0x3003;
    pub const BAD_ATTRIBUTE: i32 = 0x3004;
    pub const BAD_CONFIG: i32 = 0x3005;
    pub const BAD_CONTEXT: i32 = 0x3006;
    pub const BAD_CURRENT_SURFACE: i32 = 0x3007;
    pub const BAD_DISPLAY: i32 = 0x3008;
    pub const BAD_MATCH: i32 = 0x3009;
    pub const BAD_NATIVE_PIXMAP: i32 = 0x300A;
    pub const BAD_NATIVE_WINDOW: i32 = 0x300B;
    pub const BAD_PARAMETER: i32 = 0x300C;
    pub const BAD_SURFACE: i32 = 0x300D;
    pub const CONTEXT_LOST: i32 = 0x300E;

    pub const BLUE_SIZE: i32 = 0x3022;
    pub const GREEN_SIZE: i32 = 0x3023;
    pub const RED_SIZE: i32 = 0x3024;
    pub const SURFACE_TYPE: i32 = 0x3033;
    pub const RENDERABLE_TYPE: i32 = 0x3040;

    pub const WINDOW_BIT: i32 = 0x0004;
    pub const OPENGL_ES_BIT: i32 = 0x0001;
    pub const OPENGL_ES2_BIT: i32 = 0x0004;
    pub const OPENGL_BIT: i32 = 0x0008;
    pub const OPENGL_ES3_BIT: i32 = 0x0040;

    pub const VENDOR: i32 = 0x3053;
    pub const VERSION: i32 = 0x3054;
    pub const EXTENSIONS: i32 = 0x3055;
    pub const CLIENT_APIS: i32 = 0x308D;

    pub const OPENGL_ES_API: u32 = 0x30A0;
    pub const OPENGL_API: u32 = 0x30A2;

    pub const CONTEXT_MAJOR_VERSION: i32 = 0x3098;
    pub const CONTEXT_MINOR_VERSION: i32 = 0x30FB;

    pub const PLATFORM_WAYLAND_EXT: u32 = 0x31D8;

    pub const EXT_PLATFORM_BASE: &str = "EGL_EXT_platform_base";
    pub const EXT_PLATFORM_WAYLAND: &str = "EGL_EXT_platform_wayland";
    pub const KHR_PLATFORM_WAYLAND: &str = "EGL_KHR_platform_wayland";
}

/// GL / GLES enums shared by both families.
pub mod gl {
    pub const NO_ERROR: u32 = 0;
    pub const INVALID_ENUM: u32 = 0x0500;
    pub const INVALID_VALUE: u32 = 0x0501;
    pub const INVALID_OPERATION: u32 = 0x0502;
    pub const STACK_OVERFLOW: u32 = 0x0503;
    pub const STACK_UNDERFLOW: u32 = 0x0504;
    pub const OUT_OF_MEMORY: u32 = 0x0505;
    pub const INVALID_FRAMEBUFFER_OPERATION: u32 = 0x0506;
    pub const CONTEXT_LOST: u32 = 0x0507;

    pub const VENDOR: u32 = 0x1F00;
    pub const RENDERER: u32 = 0x1F01;
    pub const VERSION: u32 = 0x1F02;
    pub const EXTENSIONS: u32 = 0x1F03;
    pub const SHADING_LANGUAGE_VERSION: u32 = 0x8B8C;

    pub const MAJOR_VERSION: u32 = 0x821B;
    pub const MINOR_VERSION: u32 = 0x821C;
    pub const NUM_EXTENSIONS: u32 = 0x821D;
}
