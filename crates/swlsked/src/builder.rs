use crate::view::ScheduleView;

/// Builds a schedule view projector
///
/// The builder comes with a sensible set of default options,
/// and you do not need to change any of them. The scatter plot
/// defaults to a 1500 × 900 canvas, and ten frequency jump
/// markers are generated.
///
/// The API specified by the builder is part of this crate's
/// API. The actual default values are *not*, however, and
/// are subject to revision in any minor release. If you
/// care very strongly about a setting, be sure to configure
/// it here.
///
/// ```
/// use swlsked::ScheduleViewBuilder;
///
/// let view = ScheduleViewBuilder::new()
///     .with_plot_size(800, 600)
///     .with_jump_segments(5)
///     .build();
/// assert_eq!((800, 600), view.config().plot_size());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScheduleViewBuilder {
    plot_width: u32,
    plot_height: u32,
    margin_left: u32,
    margin_right: u32,
    margin_top: u32,
    margin_bottom: u32,
    jump_segments: usize,
}

impl ScheduleViewBuilder {
    /// New projector with "sensible" defaults
    pub fn new() -> Self {
        Self {
            plot_width: 1500,
            plot_height: 900,
            margin_left: 70,
            margin_right: 20,
            margin_top: 20,
            margin_bottom: 30,
            jump_segments: 10,
        }
    }

    /// Build a projector
    pub fn build(&self) -> ScheduleView {
        ScheduleView::from(self)
    }

    /// Scatter plot canvas size
    ///
    /// Both dimensions are at least one unit. If the current
    /// margins no longer fit on the canvas, they are shrunk.
    pub fn with_plot_size(&mut self, width: u32, height: u32) -> &mut Self {
        self.plot_width = u32::max(width, 1);
        self.plot_height = u32::max(height, 1);
        self.fit_margins();
        self
    }

    /// Scatter plot margins
    ///
    /// The margins surround the plotted area. Points are placed
    /// inside the margins: the lowest frequency sits on the
    /// `left` margin, and a start time of 00:00 sits on the
    /// `top` margin.
    ///
    /// Margins are shrunk as needed to leave at least one unit
    /// of plotting area in each direction.
    pub fn with_plot_margins(&mut self, left: u32, right: u32, top: u32, bottom: u32) -> &mut Self {
        self.margin_left = left;
        self.margin_right = right;
        self.margin_top = top;
        self.margin_bottom = bottom;
        self.fit_margins();
        self
    }

    /// Number of frequency jump markers
    ///
    /// Fewer than two segments disables the markers.
    pub fn with_jump_segments(&mut self, segments: usize) -> &mut Self {
        self.jump_segments = segments;
        self
    }

    /// Scatter plot canvas `(width, height)`
    pub fn plot_size(&self) -> (u32, u32) {
        (self.plot_width, self.plot_height)
    }

    /// Scatter plot margins `(left, right, top, bottom)`
    pub fn plot_margins(&self) -> (u32, u32, u32, u32) {
        (
            self.margin_left,
            self.margin_right,
            self.margin_top,
            self.margin_bottom,
        )
    }

    /// Number of frequency jump markers
    pub fn jump_segments(&self) -> usize {
        self.jump_segments
    }

    fn fit_margins(&mut self) {
        let max_w = self.plot_width.saturating_sub(1);
        self.margin_left = u32::min(self.margin_left, max_w);
        self.margin_right = u32::min(self.margin_right, max_w - self.margin_left);

        let max_h = self.plot_height.saturating_sub(1);
        self.margin_top = u32::min(self.margin_top, max_h);
        self.margin_bottom = u32::min(self.margin_bottom, max_h - self.margin_top);
    }
}

impl std::default::Default for ScheduleViewBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ScheduleViewBuilder::default();
        assert_eq!((1500, 900), cfg.plot_size());
        assert_eq!((70, 20, 20, 30), cfg.plot_margins());
        assert_eq!(10, cfg.jump_segments());
    }

    #[test]
    fn test_margins_fit_canvas() {
        let mut cfg = ScheduleViewBuilder::new();
        cfg.with_plot_size(50, 40);
        assert_eq!((49, 0, 20, 19), cfg.plot_margins());

        cfg.with_plot_size(0, 0);
        assert_eq!((1, 1), cfg.plot_size());
        assert_eq!((0, 0, 0, 0), cfg.plot_margins());

        cfg.with_plot_size(100, 100).with_plot_margins(10, 200, 5, 5);
        assert_eq!((10, 89, 5, 5), cfg.plot_margins());
    }

    #[test]
    fn test_build() {
        let view = ScheduleViewBuilder::new().with_jump_segments(3).build();
        assert_eq!(3, view.config().jump_segments());
    }
}
