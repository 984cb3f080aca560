//! Overlay texts, palette and FPS coloring
//!
//! Pure data; the viewer decides how to put it on screen.

/// sRGB color with alpha
pub type Rgba8 = [u8; 4];

pub mod palette {
    use super::Rgba8;

    pub const RAYWHITE: Rgba8 = [245, 245, 245, 255];
    pub const GREEN: Rgba8 = [0, 228, 48, 255];
    pub const DARKGRAY: Rgba8 = [80, 80, 80, 255];
    pub const GRAY: Rgba8 = [130, 130, 130, 255];
    pub const LIME: Rgba8 = [0, 158, 47, 255];
    pub const ORANGE: Rgba8 = [255, 161, 0, 255];
    pub const RED: Rgba8 = [230, 41, 55, 255];
}

/// Screen corner a text is pinned to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// A fixed line of overlay text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayText {
    pub text: &'static str,
    pub corner: Corner,
    pub size: u16,
    pub color: Rgba8,
}

pub const DROP_HINT: OverlayText = OverlayText {
    text: "Drag & drop model to load mesh/texture.",
    corner: Corner::BottomLeft,
    size: 10,
    color: palette::DARKGRAY,
};

pub const SELECTED_LABEL: OverlayText = OverlayText {
    text: "MODEL SELECTED",
    corner: Corner::TopRight,
    size: 10,
    color: palette::GREEN,
};

pub const CREDIT: OverlayText = OverlayText {
    text: "(c) Castle 3D model by Alberto Cano",
    corner: Corner::BottomRight,
    size: 10,
    color: palette::GRAY,
};

pub const FPS_CORNER: Corner = Corner::TopLeft;
pub const FPS_SIZE: u16 = 20;

/// Pixel margin between overlay text and the window edge
pub const MARGIN: f32 = 10.0;

/// Texts drawn every frame, given the current selection
pub fn overlay_texts(selected: bool) -> Vec<OverlayText> {
    let mut texts = vec![DROP_HINT, CREDIT];
    if selected {
        texts.push(SELECTED_LABEL);
    }
    texts
}

pub fn fps_color(fps: u32) -> Rgba8 {
    match fps {
        30.. => palette::LIME,
        15..=29 => palette::ORANGE,
        _ => palette::RED,
    }
}

pub fn fps_label(fps: u32) -> String {
    format!("{} FPS", fps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_color_thresholds() {
        assert_eq!(fps_color(60), palette::LIME);
        assert_eq!(fps_color(30), palette::LIME);
        assert_eq!(fps_color(29), palette::ORANGE);
        assert_eq!(fps_color(15), palette::ORANGE);
        assert_eq!(fps_color(14), palette::RED);
        assert_eq!(fps_color(0), palette::RED);
    }

    #[test]
    fn test_fps_label() {
        assert_eq!(fps_label(60), "60 FPS");
    }

    #[test]
    fn test_selected_label_only_when_selected() {
        assert!(!overlay_texts(false).contains(&SELECTED_LABEL));
        assert!(overlay_texts(true).contains(&SELECTED_LABEL));
        assert!(overlay_texts(false).contains(&DROP_HINT));
        assert!(overlay_texts(true).contains(&CREDIT));
    }
}
