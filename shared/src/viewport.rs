use crate::annotation::Point;

pub const MIN_ZOOM_TENTHS: u32 = 5;
pub const MAX_ZOOM_TENTHS: u32 = 30;
pub const DEFAULT_ZOOM_TENTHS: u32 = 10;
pub const THUMBNAIL_SCALE: f64 = 0.2;
pub const MAX_THUMBNAILS: u32 = 10;

/// Current page and zoom of the document view.
///
/// Zoom is kept in tenths so stepping by 0.1 stays exact; requests outside
/// `[1, total_pages]` or `[0.5, 3.0]` are ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    page: u32,
    total_pages: u32,
    zoom_tenths: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Viewport {
    pub fn new(total_pages: u32) -> Self {
        Self {
            page: 1,
            total_pages: total_pages.max(1),
            zoom_tenths: DEFAULT_ZOOM_TENTHS,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn scale(&self) -> f64 {
        self.zoom_tenths as f64 / 10.0
    }

    pub fn zoom_label(&self) -> String {
        format!("{}%", self.zoom_tenths * 10)
    }

    pub fn set_total_pages(&mut self, total_pages: u32) {
        self.total_pages = total_pages.max(1);
        self.page = self.page.min(self.total_pages);
    }

    pub fn go_to(&mut self, page: u32) -> bool {
        if page < 1 || page > self.total_pages || page == self.page {
            return false;
        }
        self.page = page;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to(self.page + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        match self.page.checked_sub(1) {
            Some(page) => self.go_to(page),
            None => false,
        }
    }

    pub fn zoom_in(&mut self) -> bool {
        self.set_zoom_tenths(self.zoom_tenths + 1)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.set_zoom_tenths(self.zoom_tenths.saturating_sub(1))
    }

    fn set_zoom_tenths(&mut self, tenths: u32) -> bool {
        if !(MIN_ZOOM_TENTHS..=MAX_ZOOM_TENTHS).contains(&tenths) || tenths == self.zoom_tenths {
            return false;
        }
        self.zoom_tenths = tenths;
        true
    }

    pub fn to_screen(&self, point: Point) -> Point {
        point.scaled(self.scale())
    }

    pub fn to_document(&self, point: Point) -> Point {
        point.scaled(1.0 / self.scale())
    }

    pub fn thumbnail_pages(&self) -> std::ops::RangeInclusive<u32> {
        1..=self.total_pages.min(MAX_THUMBNAILS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_in_never_exceeds_three() {
        let mut viewport = Viewport::new(3);
        for _ in 0..100 {
            viewport.zoom_in();
        }
        assert_eq!(viewport.scale(), 3.0);
        assert!(!viewport.zoom_in());
        assert_eq!(viewport.zoom_label(), "300%");
    }

    #[test]
    fn zoom_out_never_goes_below_half() {
        let mut viewport = Viewport::new(3);
        for _ in 0..100 {
            viewport.zoom_out();
        }
        assert_eq!(viewport.scale(), 0.5);
        assert!(!viewport.zoom_out());
        assert_eq!(viewport.zoom_label(), "50%");
    }

    #[test]
    fn zoom_steps_do_not_drift() {
        let mut viewport = Viewport::new(1);
        for _ in 0..7 {
            viewport.zoom_in();
        }
        for _ in 0..7 {
            viewport.zoom_out();
        }
        assert_eq!(viewport.scale(), 1.0);
        for _ in 0..10 {
            viewport.zoom_in();
        }
        assert_eq!(viewport.scale(), 2.0);
    }

    #[test]
    fn page_navigation_is_clamped() {
        let mut viewport = Viewport::new(3);
        assert!(!viewport.prev_page());
        assert_eq!(viewport.page(), 1);
        assert!(viewport.next_page());
        assert!(viewport.next_page());
        assert!(!viewport.next_page());
        assert_eq!(viewport.page(), 3);
        assert!(!viewport.go_to(0));
        assert!(!viewport.go_to(4));
        assert!(viewport.go_to(1));
    }

    #[test]
    fn shrinking_total_pages_pulls_current_page_in_range() {
        let mut viewport = Viewport::new(5);
        viewport.go_to(5);
        viewport.set_total_pages(2);
        assert_eq!(viewport.page(), 2);
        viewport.set_total_pages(0);
        assert_eq!(viewport.total_pages(), 1);
        assert_eq!(viewport.page(), 1);
    }

    #[test]
    fn screen_and_document_space_convert_by_scale() {
        let mut viewport = Viewport::new(1);
        for _ in 0..10 {
            viewport.zoom_in();
        }
        assert_eq!(viewport.to_screen(Point::new(100.0, 100.0)), Point::new(200.0, 200.0));
        assert_eq!(viewport.to_document(Point::new(200.0, 50.0)), Point::new(100.0, 25.0));
    }

    #[test]
    fn thumbnails_cover_at_most_ten_pages() {
        assert_eq!(Viewport::new(3).thumbnail_pages(), 1..=3);
        assert_eq!(Viewport::new(40).thumbnail_pages(), 1..=10);
    }
}
