//! QR code for a survey's public link.

use qrcode::render::svg;
use qrcode::QrCode;

use crate::errors::AppError;

/// Render `locator` as an SVG QR code.
pub fn qr_svg(locator: &str) -> Result<String, AppError> {
    let code = QrCode::new(locator.as_bytes())
        .map_err(|e| AppError::BadRequest(format!("Cannot encode link as QR code: {}", e)))?;

    Ok(code
        .render::<svg::Color>()
        .min_dimensions(240, 240)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build())
}
