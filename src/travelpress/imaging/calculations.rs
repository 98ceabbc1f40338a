/// Target size for an image that must fit within `max_width`.
///
/// Images already narrow enough keep their size; wider ones are scaled
/// down proportionally. Height never rounds to zero.
pub fn scaled_dimensions(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width || width == 0 {
        return (width, height);
    }
    let scale = max_width as f64 / width as f64;
    let h = (height as f64 * scale).round().max(1.0) as u32;
    (max_width, h)
}

/// Replace the file extension with `.jpg`, the encoder's output format.
pub fn jpeg_name(name: &str) -> String {
    match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{}.jpg", &name[..dot]),
        _ => format!("{}.jpg", name),
    }
}
