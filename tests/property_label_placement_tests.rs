use proptest::prelude::*;
use series_pipeline::core::{
    HorizontalAlignment, LabelLayout, Location, Margin, Size, VerticalAlignment, place_label,
    rotated_extent,
};

proptest! {
    #[test]
    fn centered_label_center_stays_on_the_point(
        x in -10_000.0f64..10_000.0,
        y in -10_000.0f64..10_000.0,
        width in 0.0f64..500.0,
        height in 0.0f64..500.0,
        rotation in -720.0f64..720.0
    ) {
        let size = Size::new(width, height);
        let layout = LabelLayout::new(HorizontalAlignment::Centered, VerticalAlignment::Centered)
            .with_rotation(rotation);
        let placed = place_label(Location::new(x, y), Margin::default(), Location::default(), size, layout);
        let extent = rotated_extent(size, rotation);

        prop_assert!((placed.x + extent.width / 2.0 - x).abs() <= 1e-6);
        prop_assert!((placed.y + extent.height / 2.0 - y).abs() <= 1e-6);
    }

    #[test]
    fn rotated_extent_bounds_the_original_box(
        width in 0.0f64..500.0,
        height in 0.0f64..500.0,
        rotation in -720.0f64..720.0
    ) {
        let extent = rotated_extent(Size::new(width, height), rotation);
        let longest = width.max(height);

        prop_assert!(extent.width >= 0.0 && extent.height >= 0.0);
        prop_assert!(extent.width <= width + height + 1e-9);
        prop_assert!(extent.height <= width + height + 1e-9);
        prop_assert!(extent.width.max(extent.height) + 1e-9 >= longest * std::f64::consts::FRAC_1_SQRT_2);
    }

    #[test]
    fn flush_alignments_never_overlap_the_point(
        x in -1_000.0f64..1_000.0,
        y in -1_000.0f64..1_000.0,
        width in 0.0f64..200.0,
        height in 0.0f64..200.0,
        margin in 0.0f64..20.0
    ) {
        let size = Size::new(width, height);
        let point = Location::new(x, y);
        let margins = Margin::uniform(margin);

        let left = place_label(point, margins, point, size, LabelLayout::new(HorizontalAlignment::Left, VerticalAlignment::Top));
        prop_assert!(left.x + width <= x - margin + 1e-9);
        prop_assert!(left.y + height <= y - margin + 1e-9);

        let right = place_label(point, margins, point, size, LabelLayout::new(HorizontalAlignment::Right, VerticalAlignment::Bottom));
        prop_assert!(right.x >= x + margin - 1e-9);
        prop_assert!(right.y >= y + margin - 1e-9);
    }
}
