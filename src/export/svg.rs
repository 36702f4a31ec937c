use crate::group::CurveGroup;
use crate::helper::DrawingHelper;
use crate::types::{CANVAS_HEIGHT, CANVAS_WIDTH, Point};

use super::fixed;

/// Coordinate pair in (y, x) order, which is what downstream consumers of
/// this format expect.
fn pair(p: &Point, precision: usize) -> String {
    format!("{} {}", fixed(p.y, precision), fixed(p.x, precision))
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Path data (d attribute) for a group, or `None` for groups with fewer than
/// two points and for malformed groups, which the render pass also rejects.
pub fn path_data(group: &CurveGroup, precision: usize) -> Option<String> {
    let points = group.points();
    if points.len() <= 1 {
        return None;
    }
    if !group.is_well_formed() {
        tracing::warn!(
            "Skipping group {} in SVG export: {} points but {} controls",
            group.id(),
            points.len(),
            group.controls().len()
        );
        return None;
    }

    let mut d = format!("M{}", pair(&points[0], precision));
    for (point, control) in points[1..].iter().zip(group.controls()) {
        d.push_str(&format!(
            " C{}, {}, {}",
            pair(&control.first, precision),
            pair(&control.second, precision),
            pair(point, precision)
        ));
    }
    Some(d)
}

/// Render every group with more than one point as an SVG document.
pub fn export_svg(helper: &DrawingHelper) -> String {
    let settings = &helper.settings;
    let precision = settings.output_precision;

    let paths: Vec<String> = helper
        .groups()
        .iter()
        .filter_map(|group| {
            path_data(group, precision).map(|d| {
                format!(
                    "<path id=\"{}\" d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
                    escape_attr(group.id()),
                    d,
                    escape_attr(&settings.main_color),
                    settings.line_width
                )
            })
        })
        .collect();

    // axes are swapped along with the coordinate pairs
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{h}" height="{w}" viewBox="0 0 {h} {w}">
    {}
</svg>"#,
        paths.join("\n    "),
        w = CANVAS_WIDTH,
        h = CANVAS_HEIGHT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_attribute_values() {
        assert_eq!(escape_attr(r#"a"<b>&"#), "a&quot;&lt;b&gt;&amp;");
    }

    #[test]
    fn pair_is_y_first() {
        assert_eq!(pair(&Point::new(1.0, 2.0), 1), "2.0 1.0");
    }
}
