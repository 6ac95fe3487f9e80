use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    E001MissingAsset,
    E002ManifestInvalid,
    E003TranslationLoadFailed,
    E004ConversionFailed,
    E005PackagingFailed,
    E006ConfigInvalid,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::E001MissingAsset => "E001_MISSING_ASSET",
            Self::E002ManifestInvalid => "E002_MANIFEST_INVALID",
            Self::E003TranslationLoadFailed => "E003_TRANSLATION_LOAD_FAILED",
            Self::E004ConversionFailed => "E004_CONVERSION_FAILED",
            Self::E005PackagingFailed => "E005_PACKAGING_FAILED",
            Self::E006ConfigInvalid => "E006_CONFIG_INVALID",
        }
    }
}

#[derive(Debug, Error)]
pub enum SdPackError {
    #[error("code=E001_MISSING_ASSET missing asset: {0}")]
    MissingAsset(String),
    #[error("code=E002_MANIFEST_INVALID manifest invalid: {0}")]
    ManifestInvalid(String),
    #[error("code=E004_CONVERSION_FAILED conversion failed: {0}")]
    ConversionFailed(String),
    #[error("code=E005_PACKAGING_FAILED packaging failed: {0}")]
    PackagingFailed(String),
    #[error("code=E006_CONFIG_INVALID config invalid: {0}")]
    ConfigInvalid(String),
}

impl SdPackError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MissingAsset(_) => ErrorCode::E001MissingAsset,
            Self::ManifestInvalid(_) => ErrorCode::E002ManifestInvalid,
            Self::ConversionFailed(_) => ErrorCode::E004ConversionFailed,
            Self::PackagingFailed(_) => ErrorCode::E005PackagingFailed,
            Self::ConfigInvalid(_) => ErrorCode::E006ConfigInvalid,
        }
    }
}
