use markera_core::pdf::PdfInfo;
use markera_core::session::Session;
use std::path::Path;

pub fn print_info(path: &Path, info: &PdfInfo) {
    println!("{}: {} page(s)", path.display(), info.page_count);
    for (i, size) in info.page_sizes.iter().enumerate() {
        println!("  page {:<4} {:.0} x {:.0} px", i + 1, size.width, size.height);
    }
}

/// List every region across all pages, in store enumeration order.
/// Main regions are labeled by index, subs as parent-sub.
pub fn print_regions(session: &Session) {
    let store = session.store();
    if store.is_empty() {
        println!("no regions defined");
        return;
    }

    for (page, region) in store.iter() {
        let label = match region.parent_id() {
            None => region.index.to_string(),
            Some(parent) => {
                let parent_index = store.get(parent).map(|p| p.index).unwrap_or(0);
                format!("{}-{}", parent_index, region.index)
            }
        };
        println!(
            "  {:<6} page {:<4} x={:<6.0} y={:<6.0} w={:<6.0} h={:.0}",
            label, page, region.rect.x, region.rect.y, region.rect.width, region.rect.height
        );
    }
}

pub fn print_result(text: &str) {
    if text.is_empty() {
        println!("no parsed text yet");
    } else {
        println!("{text}");
    }
}
