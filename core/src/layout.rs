//! Backing-store sizing for the signature canvas.

/// Floor for the CSS box, used while the container has no real layout yet
/// (display:none ancestor, collapsed panel, first paint).
pub const MIN_CSS_WIDTH: f64 = 50.0;
pub const MIN_CSS_HEIGHT: f64 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizePlan {
    pub css_width: f64,
    pub css_height: f64,
    pub backing_width: u32,
    pub backing_height: u32,
    /// Ratio actually applied, floored at 1.
    pub ratio: f64,
}

impl ResizePlan {
    /// Computes the target CSS and device-pixel sizes for a canvas filling a
    /// container of the given layout size. Pure: equal inputs give equal
    /// plans, which is what makes repeated resize events idempotent.
    pub fn compute(container_width: f64, container_height: f64, device_pixel_ratio: f64) -> Self {
        let css_width = clamp_dimension(container_width, MIN_CSS_WIDTH);
        let css_height = clamp_dimension(container_height, MIN_CSS_HEIGHT);
        let ratio = if device_pixel_ratio.is_finite() {
            device_pixel_ratio.max(1.0)
        } else {
            1.0
        };
        Self {
            css_width,
            css_height,
            backing_width: (css_width * ratio).round() as u32,
            backing_height: (css_height * ratio).round() as u32,
            ratio,
        }
    }
}

fn clamp_dimension(value: f64, min: f64) -> f64 {
    if value.is_finite() {
        value.max(min)
    } else {
        min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_by_device_pixel_ratio() {
        let plan = ResizePlan::compute(400.0, 150.0, 2.0);
        assert_eq!(plan.css_width, 400.0);
        assert_eq!(plan.css_height, 150.0);
        assert_eq!(plan.backing_width, 800);
        assert_eq!(plan.backing_height, 300);
    }

    #[test]
    fn clamps_collapsed_container_to_minimums() {
        let plan = ResizePlan::compute(0.0, 0.0, 2.0);
        assert_eq!(plan.css_width, MIN_CSS_WIDTH);
        assert_eq!(plan.css_height, MIN_CSS_HEIGHT);
        assert_eq!(plan.backing_width, (MIN_CSS_WIDTH * 2.0) as u32);
    }

    #[test]
    fn ratio_never_drops_below_one() {
        let plan = ResizePlan::compute(300.0, 100.0, 0.5);
        assert_eq!(plan.ratio, 1.0);
        assert_eq!(plan.backing_width, 300);
        assert_eq!(plan.backing_height, 100);
        let plan = ResizePlan::compute(300.0, 100.0, f64::NAN);
        assert_eq!(plan.ratio, 1.0);
        assert_eq!(plan.backing_width, 300);
    }

    #[test]
    fn unchanged_inputs_give_identical_plans() {
        let first = ResizePlan::compute(320.5, 180.25, 1.5);
        let second = ResizePlan::compute(320.5, 180.25, 1.5);
        assert_eq!(first, second);
    }
}
