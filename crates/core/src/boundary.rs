use crate::config::LayoutConfig;
use crate::title::FormTitleCandidate;
use crate::word::ContentBounds;

/// A title candidate paired with the region its content occupies.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedTitle {
    pub candidate: FormTitleCandidate,
    pub bounds: ContentBounds,
}

/// Derive a content region for every title on a page, top to bottom.
///
/// Each region starts just below its title and ends just above the next
/// title, or above the bottom margin for the last one. Horizontal extents
/// come straight from the configured margins. Inverted regions are returned
/// as-is; callers decide what to do with them.
pub fn calculate_boundaries(
    mut candidates: Vec<FormTitleCandidate>,
    page_height: f64,
    config: &LayoutConfig,
) -> Vec<BoundedTitle> {
    candidates.sort_by(|a, b| a.title_y.total_cmp(&b.title_y));

    let next_title_ys: Vec<Option<f64>> = candidates
        .iter()
        .skip(1)
        .map(|c| Some(c.title_y))
        .chain(std::iter::once(None))
        .collect();

    candidates
        .into_iter()
        .zip(next_title_ys)
        .map(|(candidate, next_y)| {
            let bottom_y = match next_y {
                Some(y) => y - config.next_title_gap,
                None => page_height - config.bottom_margin,
            };
            let bounds = ContentBounds {
                top_y: candidate.title_y + config.content_top_offset,
                bottom_y,
                left_x: config.left_x,
                right_x: config.right_x,
            };
            BoundedTitle { candidate, bounds }
        })
        .collect()
}
