// Domain rules - Checks applied to a request before and after resolution

use std::path::Path;

use crate::domain::errors::*;
use crate::domain::model::*;


/// Extension every accepted source file carries, compared case-insensitively
pub const YUV_EXTENSION: &str = "yuv";

/// Accept only paths whose file name has a non-empty stem and a `.yuv` suffix
pub fn check_yuv_extension(path: &Path) -> Result<(), DomainError> {
    let rejected = || DomainError::InvalidExtension(path.display().to_string());

    // `Path::extension` yields None for dotfiles such as ".yuv"
    let extension = path.extension().ok_or_else(rejected)?;
    let stem = path.file_stem().ok_or_else(rejected)?;

    if stem.is_empty() || !extension.eq_ignore_ascii_case(YUV_EXTENSION) {
        return Err(rejected());
    }
    Ok(())
}

/// A cut must leave at least one whole frame
pub fn ensure_cut_fits(geometry: &VideoGeometry) -> Result<(), DomainError> {
    if geometry.frames_to_remove >= geometry.frame_count {
        return Err(DomainError::CutExceedsAvailableFrames {
            requested: geometry.frames_to_remove,
            available: geometry.frame_count,
        });
    }
    Ok(())
}

/// Refuse to truncate the source by writing the output over it.
///
/// Paths are compared after canonicalization when both exist, lexically
/// otherwise.
pub fn ensure_output_differs(input: &Path, output: &Path) -> Result<(), DomainError> {
    let same = match (input.canonicalize(), output.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => input == output,
    };
    if same {
        return Err(DomainError::OutputIsInput(output.display().to_string()));
    }
    Ok(())
}
