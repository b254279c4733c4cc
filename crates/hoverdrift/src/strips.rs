/// The hoverable link list, rendered as equal horizontal bands stacked top
/// to bottom across the window; band `i` stands in for item `i`'s element.
pub struct HoverStrips {
    count: usize,
    width: f32,
    height: f32,
}

impl HoverStrips {
    pub fn new(count: usize, width: f32, height: f32) -> Self {
        Self {
            count,
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
    }

    /// The item under a cursor at window y coordinate `y` (pixels, top
    /// origin), or `None` outside the window.
    pub fn index_at(&self, y: f32) -> Option<usize> {
        if self.count == 0 || y < 0.0 || y >= self.height {
            return None;
        }
        let band = self.height / self.count as f32;
        Some(((y / band) as usize).min(self.count - 1))
    }

    /// Window pixel coordinates (top origin) to normalized [-1, 1] with y
    /// up, which is what the effect's pointer mapping expects.
    pub fn normalized(&self, x: f32, y: f32) -> (f32, f32) {
        (
            (x / self.width) * 2.0 - 1.0,
            1.0 - (y / self.height) * 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_split_the_height_evenly() {
        let strips = HoverStrips::new(4, 800.0, 600.0);
        assert_eq!(strips.index_at(0.0), Some(0));
        assert_eq!(strips.index_at(149.0), Some(0));
        assert_eq!(strips.index_at(150.0), Some(1));
        assert_eq!(strips.index_at(599.0), Some(3));
        assert_eq!(strips.index_at(600.0), None);
        assert_eq!(strips.index_at(-1.0), None);
    }

    #[test]
    fn normalization_matches_the_effect_convention() {
        let strips = HoverStrips::new(2, 1000.0, 800.0);
        assert_eq!(strips.normalized(500.0, 400.0), (0.0, 0.0));
        assert_eq!(strips.normalized(750.0, 600.0), (0.5, -0.5));
        assert_eq!(strips.normalized(0.0, 0.0), (-1.0, 1.0));
        assert_eq!(strips.normalized(1000.0, 800.0), (1.0, -1.0));
    }

    #[test]
    fn resize_moves_the_band_edges() {
        let mut strips = HoverStrips::new(2, 800.0, 600.0);
        assert_eq!(strips.index_at(400.0), Some(1));
        strips.resize(800.0, 1200.0);
        assert_eq!(strips.index_at(400.0), Some(0));
    }
}
