//! 검출 영역 표시.
//!
//! 컬러 프레임에 바운딩 박스를 그린다 (초록, 두께 2px).

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect as DrawRect;
use motionwatch_core::models::motion::MotionRegion;

/// 박스 색상
const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// 박스 두께 (픽셀)
const BOX_THICKNESS: u32 = 2;

/// 영역 박스를 그린 사본 반환
pub fn annotate_regions(frame: &RgbImage, regions: &[MotionRegion]) -> RgbImage {
    let mut out = frame.clone();
    draw_regions_mut(&mut out, regions);
    out
}

/// 프레임에 직접 영역 박스 그리기
pub fn draw_regions_mut(frame: &mut RgbImage, regions: &[MotionRegion]) {
    for region in regions {
        let b = region.bounds;
        // 안쪽으로 한 겹씩 줄여가며 두께 표현
        for inset in 0..BOX_THICKNESS {
            let w = b.w.saturating_sub(inset * 2);
            let h = b.h.saturating_sub(inset * 2);
            if w == 0 || h == 0 {
                break;
            }
            let rect = DrawRect::at((b.x + inset) as i32, (b.y + inset) as i32).of_size(w, h);
            draw_hollow_rect_mut(frame, rect, BOX_COLOR);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use motionwatch_core::models::motion::Rect;

    #[test]
    fn draws_box_border_only() {
        let frame = RgbImage::new(40, 40);
        let region = MotionRegion {
            bounds: Rect {
                x: 10,
                y: 10,
                w: 20,
                h: 20,
            },
            area: 400,
        };

        let out = annotate_regions(&frame, &[region]);
        assert_eq!(*out.get_pixel(10, 10), BOX_COLOR);
        assert_eq!(*out.get_pixel(11, 11), BOX_COLOR);
        assert_eq!(*out.get_pixel(20, 20), Rgb([0, 0, 0]));
        // 원본은 그대로
        assert_eq!(*frame.get_pixel(10, 10), Rgb([0, 0, 0]));
    }

    #[test]
    fn no_regions_no_change() {
        let frame = RgbImage::from_pixel(8, 8, Rgb([5, 5, 5]));
        assert_eq!(annotate_regions(&frame, &[]), frame);
    }
}
