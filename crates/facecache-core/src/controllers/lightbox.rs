use crate::models::Photo;

/// Full-size viewer state for a person's photo list.
///
/// Only holds an index; the photo list lives in the controller and its length
/// is passed in. Navigation never wraps and never leaves `[0, len - 1]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lightbox {
    open: bool,
    index: usize,
    image_error: bool,
}

impl Lightbox {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Set when the current photo failed to display (e.g. its URL expired).
    pub fn image_error(&self) -> bool {
        self.image_error
    }

    /// Open at `index`, clamped into the list. Does nothing for an empty list.
    pub fn open(&mut self, index: usize, len: usize) -> bool {
        if len == 0 {
            return false;
        }
        self.select(index.min(len - 1));
        self.open = true;
        true
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn has_prev(&self) -> bool {
        self.index > 0
    }

    pub fn has_next(&self, len: usize) -> bool {
        self.index + 1 < len
    }

    pub fn prev(&mut self) -> bool {
        if !self.has_prev() {
            return false;
        }
        self.select(self.index - 1);
        true
    }

    pub fn next(&mut self, len: usize) -> bool {
        if !self.has_next(len) {
            return false;
        }
        self.select(self.index + 1);
        true
    }

    /// Jump to `index`; out-of-range requests are ignored.
    pub fn navigate(&mut self, index: usize, len: usize) -> bool {
        if index >= len {
            return false;
        }
        self.select(index);
        true
    }

    pub fn mark_image_error(&mut self) {
        self.image_error = true;
    }

    pub fn current<'a>(&self, photos: &'a [Photo]) -> Option<&'a Photo> {
        photos.get(self.index)
    }

    pub fn position_label(&self, len: usize) -> String {
        format!("{} / {}", self.index + 1, len)
    }

    fn select(&mut self, index: usize) {
        if index != self.index {
            self.image_error = false;
        }
        self.index = index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prev_at_start_is_noop() {
        let mut lb = Lightbox::default();
        assert!(lb.open(0, 3));
        assert!(!lb.prev());
        assert_eq!(lb.index(), 0);
    }

    #[test]
    fn test_next_at_end_is_noop() {
        let mut lb = Lightbox::default();
        lb.open(2, 3);
        assert!(!lb.next(3));
        assert_eq!(lb.index(), 2);
        assert_eq!(lb.position_label(3), "3 / 3");
    }

    #[test]
    fn test_walk_stays_in_bounds() {
        let mut lb = Lightbox::default();
        let len = 4;
        lb.open(1, len);
        for _ in 0..10 {
            lb.next(len);
            assert!(lb.index() < len);
        }
        assert_eq!(lb.index(), len - 1);
        for _ in 0..10 {
            lb.prev();
        }
        assert_eq!(lb.index(), 0);
    }

    #[test]
    fn test_open_clamps_and_rejects_empty() {
        let mut lb = Lightbox::default();
        assert!(!lb.open(0, 0));
        assert!(!lb.is_open());

        assert!(lb.open(99, 5));
        assert_eq!(lb.index(), 4);
        assert!(!lb.navigate(5, 5));
        assert_eq!(lb.index(), 4);
    }

    #[test]
    fn test_switching_photo_clears_image_error() {
        let mut lb = Lightbox::default();
        lb.open(0, 3);
        lb.mark_image_error();
        assert!(lb.image_error());

        // Re-selecting the same photo keeps the flag
        lb.navigate(0, 3);
        assert!(lb.image_error());

        lb.next(3);
        assert!(!lb.image_error());
    }

    #[test]
    fn test_close_keeps_index() {
        let mut lb = Lightbox::default();
        lb.open(2, 3);
        lb.close();
        assert!(!lb.is_open());
        assert_eq!(lb.index(), 2);
    }
}
