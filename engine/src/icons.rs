pub const TEXT: &str = r#"<svg width="24" height="24" viewBox="0 0 24 24"><path stroke="currentColor" stroke-width="2" stroke-linecap="round" d="M8 9V7.2h8V9M12 7.2v10M10 17h4"/></svg>"#;

pub const CHEVRON_UP: &str = r#"<svg width="24" height="24" viewBox="0 0 24 24"><path stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" d="M7 15l5-5 5 5"/></svg>"#;

pub const CHEVRON_DOWN: &str = r#"<svg width="24" height="24" viewBox="0 0 24 24"><path stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" d="M7 10l5 5 5-5"/></svg>"#;

pub const CROSS: &str = r#"<svg width="24" height="24" viewBox="0 0 24 24"><path stroke="currentColor" stroke-width="2" stroke-linecap="round" d="M8 8l8 8M16 8l-8 8"/></svg>"#;
