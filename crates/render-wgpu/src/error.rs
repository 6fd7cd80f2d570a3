use jellyscape_assets::AssetError;
use jellyscape_render::ShaderError;

/// Errors from GPU setup and frame submission.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter found")]
    NoAdapter,
    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
    #[error("shader composition failed: {0}")]
    Shader(#[from] ShaderError),
    #[error("texture unavailable: {0}")]
    Asset(#[from] AssetError),
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}
