pub fn root_container_style() -> &'static str {
    "height: 100vh; display: flex; flex-direction: column; overflow: hidden; font-family: sans-serif; color: #222;"
}

pub fn nav_bar_style() -> &'static str {
    "display: flex; gap: 4px; padding: 8px 12px; border-bottom: 1px solid #ddd; background: #fafafa;"
}

pub fn nav_button_style(active: bool) -> String {
    let (background, weight) = if active { ("#eef4ff", "600") } else { ("transparent", "400") };
    format!(
        "border: 1px solid #bbb; background: {background}; font-weight: {weight}; padding: 6px 14px; border-radius: 6px; cursor: pointer;"
    )
}

pub fn screen_style() -> &'static str {
    "flex: 1; min-height: 0; display: flex; flex-direction: column; gap: 8px; padding: 12px;"
}

pub fn toolbar_style() -> &'static str {
    "display: flex; flex-wrap: wrap; align-items: center; gap: 8px;"
}

pub fn table_container_style() -> &'static str {
    "position: relative; flex: 1; min-height: 0; overflow: auto; border: 1px solid #ddd; border-radius: 6px;"
}

pub fn table_style() -> &'static str {
    "border-collapse: collapse; width: 100%;"
}

pub fn table_header_cell_style(clickable: bool) -> String {
    let cursor = if clickable { "pointer" } else { "default" };
    format!(
        "position: sticky; top: 0; z-index: 1; background: #f4f4f4; border: 1px solid #bbb; padding: 6px; text-align: left; white-space: nowrap; cursor: {cursor};"
    )
}

pub fn table_cell_style() -> &'static str {
    "border: 1px solid #bbb; padding: 4px 6px; vertical-align: top;"
}

pub fn loading_overlay_style() -> &'static str {
    "position: absolute; inset: 0; z-index: 2; display: flex; align-items: center; justify-content: center; background: rgba(255,255,255,0.6); pointer-events: none;"
}

pub fn field_error_style() -> &'static str {
    "color: #c0262d; font-size: 12px; margin-top: 2px;"
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Error,
    Notice,
}

pub fn banner_style(kind: BannerKind) -> String {
    let (background, border) = match kind {
        BannerKind::Error => ("#fdecec", "#e0a0a0"),
        BannerKind::Notice => ("#eaf6ec", "#9ccaa4"),
    };
    format!(
        "display: flex; justify-content: space-between; align-items: center; gap: 8px; padding: 8px 12px; border: 1px solid {border}; border-radius: 6px; background: {background};"
    )
}

pub fn button_style(disabled: bool) -> String {
    let (cursor, opacity) = if disabled { ("not-allowed", "0.5") } else { ("pointer", "1") };
    format!(
        "border: 1px solid #bbb; background: #fff; padding: 4px 10px; border-radius: 6px; cursor: {cursor}; opacity: {opacity};"
    )
}

pub fn modal_backdrop_style() -> &'static str {
    "position: fixed; inset: 0; z-index: 1100; display: flex; align-items: center; justify-content: center; background: rgba(0,0,0,0.35);"
}

pub fn modal_style() -> &'static str {
    "min-width: 360px; max-height: 80vh; overflow-y: auto; background: #fff; border-radius: 8px; padding: 16px; box-shadow: 0 10px 24px rgba(0,0,0,0.15); display: flex; flex-direction: column; gap: 10px;"
}
