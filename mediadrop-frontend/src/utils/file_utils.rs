use mediadrop_types::MediaKind;

pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["Bytes", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        // Trim trailing zeros: 1.50 -> 1.5, 2.00 -> 2
        let rounded = format!("{:.2}", size);
        let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
        format!("{} {}", trimmed, UNITS[unit_index])
    }
}

pub fn get_file_icon(mime_type: &str) -> &'static str {
    match MediaKind::from_mime(mime_type) {
        Some(MediaKind::Image) => "🖼️",
        Some(MediaKind::Video) => "🎥",
        Some(MediaKind::Audio) => "🎵",
        None => "📁",
    }
}
