pub type CoverResult<T> = Result<T, CoverError>;

#[derive(thiserror::Error, Debug)]
pub enum CoverError {
    #[error("art decode error: {0}")]
    ArtDecode(String),

    #[error("palette validation error: {0}")]
    PaletteValidation(String),

    #[error("no renderer available: {0}")]
    NoRendererAvailable(String),

    #[error("tag embed error: {0}")]
    TagEmbed(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoverError {
    pub fn art_decode(msg: impl Into<String>) -> Self {
        Self::ArtDecode(msg.into())
    }

    pub fn palette_validation(msg: impl Into<String>) -> Self {
        Self::PaletteValidation(msg.into())
    }

    pub fn no_renderer_available(msg: impl Into<String>) -> Self {
        Self::NoRendererAvailable(msg.into())
    }

    pub fn tag_embed(msg: impl Into<String>) -> Self {
        Self::TagEmbed(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
