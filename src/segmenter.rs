use log::trace;
use ndarray::Array2;

use crate::background::BackgroundModel;
use crate::bbox::BoundingBox;
use crate::config::Config;
use crate::frame::Frame;
use crate::math;

/// Maximal 8-connected foreground region.
struct Region {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
    pixels: usize,
}

impl Region {
    fn bbox(&self) -> BoundingBox {
        BoundingBox::new(
            self.min_x as f32,
            self.min_y as f32,
            (self.max_x - self.min_x + 1) as f32,
            (self.max_y - self.min_y + 1) as f32,
        )
    }
}

/// Turns raw frames into candidate boxes: background subtraction, an
/// opening pass against sensor-grain speckle, connected-component
/// extraction and the configured region filters.
pub struct MotionSegmenter {
    model: BackgroundModel,
    blur_radius: usize,
    kernel_size: usize,
    min_area: f32,
    max_regions: Option<usize>,
    size_band_ratio: Option<f32>,
}

impl MotionSegmenter {
    pub fn new(config: &Config) -> Self {
        Self {
            model: BackgroundModel::new(config.history_length, config.variance_threshold),
            blur_radius: config.blur_radius,
            kernel_size: config.morphology_kernel_size,
            min_area: config.min_area,
            max_regions: config.max_regions,
            size_band_ratio: config.size_band_ratio,
        }
    }

    /// Adopts new tunables while keeping the accumulated scene estimate.
    pub(crate) fn reconfigure(&mut self, config: &Config) {
        self.model
            .set_params(config.history_length, config.variance_threshold);
        self.blur_radius = config.blur_radius;
        self.kernel_size = config.morphology_kernel_size;
        self.min_area = config.min_area;
        self.max_regions = config.max_regions;
        self.size_band_ratio = config.size_band_ratio;
    }

    /// Runs one frame through the model and returns the surviving
    /// candidate boxes. Zero boxes is a normal outcome, not an error.
    pub fn segment(&mut self, frame: &Frame) -> Vec<BoundingBox> {
        let luma = blurred_luma(&frame.pixels, self.blur_radius);
        let mask = self.model.apply(&luma);
        let mask = opening(&mask, self.kernel_size);

        let mut regions = label_regions(&mask);
        let raw = regions.len();

        regions.retain(|r| r.pixels as f32 >= self.min_area);

        if let Some(ratio) = self.size_band_ratio {
            let mut areas: Vec<f32> = regions.iter().map(|r| r.pixels as f32).collect();
            let median = math::median(&mut areas);
            let lo = median * (1.0 - ratio);
            let hi = median * (1.0 + ratio);
            regions.retain(|r| {
                let area = r.pixels as f32;
                area >= lo && area <= hi
            });
        }

        // Largest first; equal areas keep discovery (scan) order.
        regions.sort_by(|a, b| b.pixels.cmp(&a.pixels));

        if let Some(cap) = self.max_regions {
            regions.truncate(cap);
        }

        trace!(
            "frame t={:.3}s: {} raw regions, {} kept",
            frame.timestamp,
            raw,
            regions.len()
        );

        regions.iter().map(Region::bbox).collect()
    }
}

fn blurred_luma(pixels: &Array2<u8>, radius: usize) -> Array2<f32> {
    let luma = pixels.map(|&p| p as f32);

    if radius == 0 {
        return luma;
    }

    let (h, w) = luma.dim();
    let mut horiz = Array2::zeros((h, w));

    for y in 0..h {
        for x in 0..w {
            let x0 = x.saturating_sub(radius);
            let x1 = (x + radius + 1).min(w);
            let mut sum = 0.0;
            for xi in x0..x1 {
                sum += luma[[y, xi]];
            }
            horiz[[y, x]] = sum / (x1 - x0) as f32;
        }
    }

    let mut out = Array2::zeros((h, w));

    for y in 0..h {
        let y0 = y.saturating_sub(radius);
        let y1 = (y + radius + 1).min(h);
        for x in 0..w {
            let mut sum = 0.0;
            for yi in y0..y1 {
                sum += horiz[[yi, x]];
            }
            out[[y, x]] = sum / (y1 - y0) as f32;
        }
    }

    out
}

/// Erosion then dilation with a square kernel; a 1-pixel kernel is the
/// identity.
fn opening(mask: &Array2<bool>, kernel_size: usize) -> Array2<bool> {
    if kernel_size <= 1 {
        return mask.clone();
    }

    dilate(&erode(mask, kernel_size), kernel_size)
}

fn erode(mask: &Array2<bool>, k: usize) -> Array2<bool> {
    let (h, w) = mask.dim();
    let half = k / 2;
    let mut out = Array2::from_elem((h, w), false);

    for y in 0..h {
        let y0 = y.saturating_sub(half);
        let y1 = (y + (k - half)).min(h);
        for x in 0..w {
            let x0 = x.saturating_sub(half);
            let x1 = (x + (k - half)).min(w);

            let mut all = true;
            'window: for yi in y0..y1 {
                for xi in x0..x1 {
                    if !mask[[yi, xi]] {
                        all = false;
                        break 'window;
                    }
                }
            }

            out[[y, x]] = all;
        }
    }

    out
}

fn dilate(mask: &Array2<bool>, k: usize) -> Array2<bool> {
    let (h, w) = mask.dim();
    let half = k / 2;
    let mut out = Array2::from_elem((h, w), false);

    for y in 0..h {
        let y0 = y.saturating_sub(half);
        let y1 = (y + (k - half)).min(h);
        for x in 0..w {
            let x0 = x.saturating_sub(half);
            let x1 = (x + (k - half)).min(w);

            let mut any = false;
            'window: for yi in y0..y1 {
                for xi in x0..x1 {
                    if mask[[yi, xi]] {
                        any = true;
                        break 'window;
                    }
                }
            }

            out[[y, x]] = any;
        }
    }

    out
}

/// 8-connected component sweep over the mask, row-major discovery order.
fn label_regions(mask: &Array2<bool>) -> Vec<Region> {
    let (h, w) = mask.dim();
    let mut visited = Array2::from_elem((h, w), false);
    let mut regions = Vec::new();
    let mut stack = Vec::new();

    for y in 0..h {
        for x in 0..w {
            if !mask[[y, x]] || visited[[y, x]] {
                continue;
            }

            let mut region = Region {
                min_x: x,
                min_y: y,
                max_x: x,
                max_y: y,
                pixels: 0,
            };

            visited[[y, x]] = true;
            stack.push((y, x));

            while let Some((cy, cx)) = stack.pop() {
                region.pixels += 1;
                region.min_x = region.min_x.min(cx);
                region.max_x = region.max_x.max(cx);
                region.min_y = region.min_y.min(cy);
                region.max_y = region.max_y.max(cy);

                let y0 = cy.saturating_sub(1);
                let y1 = (cy + 2).min(h);
                let x0 = cx.saturating_sub(1);
                let x1 = (cx + 2).min(w);

                for ny in y0..y1 {
                    for nx in x0..x1 {
                        if mask[[ny, nx]] && !visited[[ny, nx]] {
                            visited[[ny, nx]] = true;
                            stack.push((ny, nx));
                        }
                    }
                }
            }

            regions.push(region);
        }
    }

    regions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with_square(
        w: usize,
        h: usize,
        ts: f32,
        x: usize,
        y: usize,
        side: usize,
    ) -> Frame {
        let mut pixels = Array2::from_elem((h, w), 0u8);
        for yy in y..y + side {
            for xx in x..x + side {
                pixels[[yy, xx]] = 255;
            }
        }
        Frame::new(pixels, ts)
    }

    fn blank_frame(w: usize, h: usize, ts: f32) -> Frame {
        Frame::new(Array2::from_elem((h, w), 0u8), ts)
    }

    fn segmenter(config: &Config) -> MotionSegmenter {
        MotionSegmenter::new(config)
    }

    fn test_config() -> Config {
        Config {
            min_area: 30.0,
            blur_radius: 0,
            ..Config::default()
        }
    }

    #[test]
    fn first_frame_seeds_and_detects_nothing() {
        let cfg = test_config();
        let mut seg = segmenter(&cfg);

        let boxes = seg.segment(&frame_with_square(32, 32, 0.0, 8, 8, 10));
        assert!(boxes.is_empty());
    }

    #[test]
    fn square_appearing_after_seeding_is_boxed_exactly() {
        let cfg = test_config();
        let mut seg = segmenter(&cfg);

        seg.segment(&blank_frame(32, 32, 0.0));
        let boxes = seg.segment(&frame_with_square(32, 32, 0.04, 8, 8, 10));

        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0], BoundingBox::new(8.0, 8.0, 10.0, 10.0));
    }

    #[test]
    fn opening_removes_single_pixel_speckle() {
        let cfg = test_config();
        let mut seg = segmenter(&cfg);

        seg.segment(&blank_frame(32, 32, 0.0));

        let mut pixels = Array2::from_elem((32, 32), 0u8);
        pixels[[3, 3]] = 255;
        pixels[[20, 27]] = 255;
        let boxes = seg.segment(&Frame::new(pixels, 0.04));

        assert!(boxes.is_empty());
    }

    #[test]
    fn min_area_drops_small_regions() {
        let cfg = Config {
            min_area: 200.0,
            blur_radius: 0,
            ..Config::default()
        };
        let mut seg = segmenter(&cfg);

        seg.segment(&blank_frame(64, 64, 0.0));

        // 10x10 = 100 px < 200, 20x20 = 400 px >= 200.
        let mut pixels = Array2::from_elem((64, 64), 0u8);
        for (x, y, side) in [(4, 4, 10), (30, 30, 20)] {
            for yy in y..y + side {
                for xx in x..x + side {
                    pixels[[yy, xx]] = 255;
                }
            }
        }
        let boxes = seg.segment(&Frame::new(pixels, 0.04));

        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0], BoundingBox::new(30.0, 30.0, 20.0, 20.0));
    }

    #[test]
    fn largest_n_cap_keeps_biggest_regions() {
        let cfg = Config {
            min_area: 10.0,
            blur_radius: 0,
            max_regions: Some(1),
            ..Config::default()
        };
        let mut seg = segmenter(&cfg);

        seg.segment(&blank_frame(64, 64, 0.0));

        let mut pixels = Array2::from_elem((64, 64), 0u8);
        for (x, y, side) in [(4, 4, 6), (30, 30, 12)] {
            for yy in y..y + side {
                for xx in x..x + side {
                    pixels[[yy, xx]] = 255;
                }
            }
        }
        let boxes = seg.segment(&Frame::new(pixels, 0.04));

        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0], BoundingBox::new(30.0, 30.0, 12.0, 12.0));
    }

    #[test]
    fn size_band_keeps_median_sized_regions() {
        let cfg = Config {
            min_area: 10.0,
            blur_radius: 0,
            size_band_ratio: Some(0.5),
            ..Config::default()
        };
        let mut seg = segmenter(&cfg);

        seg.segment(&blank_frame(96, 96, 0.0));

        // Areas 36, 49 and 400; median 49, band [24.5, 73.5].
        let mut pixels = Array2::from_elem((96, 96), 0u8);
        for (x, y, side) in [(4, 4, 6), (20, 20, 7), (50, 50, 20)] {
            for yy in y..y + side {
                for xx in x..x + side {
                    pixels[[yy, xx]] = 255;
                }
            }
        }
        let boxes = seg.segment(&Frame::new(pixels, 0.04));

        assert_eq!(boxes.len(), 2);
        assert!(boxes.iter().all(|b| b.area() < 100.0));
    }

    #[test]
    fn blur_still_detects_a_solid_square() {
        let cfg = Config {
            min_area: 30.0,
            blur_radius: 1,
            ..Config::default()
        };
        let mut seg = segmenter(&cfg);

        seg.segment(&blank_frame(32, 32, 0.0));
        let boxes = seg.segment(&frame_with_square(32, 32, 0.04, 8, 8, 12));

        assert_eq!(boxes.len(), 1);
    }

    #[test]
    fn touching_diagonal_pixels_form_one_region() {
        let mut mask = Array2::from_elem((8, 8), false);
        mask[[2, 2]] = true;
        mask[[3, 3]] = true;
        mask[[4, 4]] = true;

        let regions = label_regions(&mask);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].pixels, 3);
        assert_eq!(regions[0].bbox(), BoundingBox::new(2.0, 2.0, 3.0, 3.0));
    }
}
