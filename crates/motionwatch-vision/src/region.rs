//! 움직임 영역 필터.
//!
//! 융합 맵의 외곽 연결 요소(8방향)를 찾아 바운딩 박스와 면적을 계산하고,
//! 최소 면적 미만 요소는 노이즈로 버린다.
//!
//! 면적은 외곽선이 감싸는 픽셀 수다. 요소 내부의 구멍(4방향 배경 요소 중
//! 이미지 경계에 닿지 않는 것)은 감싸는 요소의 면적에 포함되고, 구멍 안에
//! 놓인 요소는 별도 영역이 아니라 바깥 요소의 일부로 센다.

use image::Luma;
use imageproc::region_labelling::{connected_components, Connectivity};
use motionwatch_core::models::motion::{MotionMap, MotionRegion, Rect, MASK_ON};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// 영역 필터 결과
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionSet {
    /// 최소 면적 이상 영역 (래스터 발견 순서)
    pub regions: Vec<MotionRegion>,
    /// 버려진 요소 수
    pub discarded: usize,
}

impl RegionSet {
    /// 이번 사이클 움직임 판정
    pub fn any_region_present(&self) -> bool {
        !self.regions.is_empty()
    }
}

/// 연결 요소 누적 통계
struct ComponentStats {
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
    area: u32,
}

impl ComponentStats {
    fn new(x: u32, y: u32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
            area: 0,
        }
    }

    fn add(&mut self, x: u32, y: u32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
        self.area += 1;
    }

    fn into_region(self) -> MotionRegion {
        MotionRegion {
            bounds: Rect {
                x: self.min_x,
                y: self.min_y,
                w: self.max_x - self.min_x + 1,
                h: self.max_y - self.min_y + 1,
            },
            area: self.area,
        }
    }
}

/// 최소 면적 기반 영역 필터
#[derive(Debug, Clone, Copy)]
pub struct RegionFilter {
    min_area: u32,
}

impl RegionFilter {
    pub fn new(min_area: u32) -> Self {
        Self { min_area }
    }

    pub fn min_area(&self) -> u32 {
        self.min_area
    }

    /// 외곽 연결 요소 추출 + 면적 필터
    pub fn filter(&self, map: &MotionMap) -> RegionSet {
        if !map.any() {
            return RegionSet::default();
        }

        let mask = map.as_image();
        let foreground = connected_components(mask, Connectivity::Eight, Luma([0u8]));
        let background = connected_components(mask, Connectivity::Four, Luma([MASK_ON]));
        let outside = border_labels(&background);

        let mut fg_owner: HashMap<u32, Owner> = HashMap::new();
        let mut bg_owner: HashMap<u32, Owner> = HashMap::new();
        let mut components: Vec<ComponentStats> = Vec::new();

        // 래스터 순서: 각 요소의 첫 픽셀 왼쪽 이웃은 이미 분류되어 있다
        for (x, y, pixel) in mask.enumerate_pixels() {
            let owner = if pixel[0] != 0 {
                let label = foreground.get_pixel(x, y)[0];
                *fg_owner.entry(label).or_insert_with(|| {
                    let enclosing = if x == 0 {
                        Owner::Outside
                    } else {
                        let left = background.get_pixel(x - 1, y)[0];
                        bg_owner.get(&left).copied().unwrap_or(Owner::Outside)
                    };
                    match enclosing {
                        Owner::Own(idx) | Owner::Enclosed(idx) => Owner::Enclosed(idx),
                        Owner::Outside => {
                            components.push(ComponentStats::new(x, y));
                            Owner::Own(components.len() - 1)
                        }
                    }
                })
            } else {
                let label = background.get_pixel(x, y)[0];
                *bg_owner.entry(label).or_insert_with(|| {
                    if outside.contains(&label) || x == 0 {
                        return Owner::Outside;
                    }
                    let left = foreground.get_pixel(x - 1, y)[0];
                    match fg_owner.get(&left) {
                        Some(Owner::Own(idx)) | Some(Owner::Enclosed(idx)) => {
                            Owner::Enclosed(*idx)
                        }
                        _ => Owner::Outside,
                    }
                })
            };

            match owner {
                Owner::Own(idx) => components[idx].add(x, y),
                Owner::Enclosed(idx) => components[idx].area += 1,
                Owner::Outside => {}
            }
        }

        let total = components.len();
        let regions: Vec<MotionRegion> = components
            .into_iter()
            .filter(|c| c.area >= self.min_area)
            .map(ComponentStats::into_region)
            .collect();

        debug!(
            "영역 필터: {}개 요소 중 {}개 유지 (최소 면적 {})",
            total,
            regions.len(),
            self.min_area
        );

        RegionSet {
            discarded: total - regions.len(),
            regions,
        }
    }
}

/// 픽셀이 면적을 더하는 대상
#[derive(Debug, Clone, Copy)]
enum Owner {
    /// 외곽 요소 자체 (바운딩 박스 + 면적)
    Own(usize),
    /// 외곽 요소 내부의 구멍 또는 중첩 요소 (면적만)
    Enclosed(usize),
    /// 바깥 배경
    Outside,
}

/// 이미지 경계에 닿는 배경 라벨
fn border_labels(background: &image::ImageBuffer<Luma<u32>, Vec<u32>>) -> HashSet<u32> {
    let (w, h) = background.dimensions();
    let mut labels = HashSet::new();
    for x in 0..w {
        labels.insert(background.get_pixel(x, 0)[0]);
        labels.insert(background.get_pixel(x, h - 1)[0]);
    }
    for y in 0..h {
        labels.insert(background.get_pixel(0, y)[0]);
        labels.insert(background.get_pixel(w - 1, y)[0]);
    }
    labels.remove(&0);
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_with_blocks(w: u32, h: u32, blocks: &[(u32, u32, u32, u32)]) -> MotionMap {
        let mut map = MotionMap::empty(w, h);
        for &(x0, y0, bw, bh) in blocks {
            for y in y0..y0 + bh {
                for x in x0..x0 + bw {
                    map.set(x, y);
                }
            }
        }
        map
    }

    #[test]
    fn empty_map_has_no_regions() {
        let set = RegionFilter::new(1).filter(&MotionMap::empty(32, 32));
        assert!(!set.any_region_present());
        assert_eq!(set.discarded, 0);
    }

    #[test]
    fn area_exactly_at_minimum_is_kept() {
        // 5x4 = 20
        let map = map_with_blocks(32, 32, &[(3, 3, 5, 4)]);
        let set = RegionFilter::new(20).filter(&map);
        assert!(set.any_region_present());
        assert_eq!(set.regions[0].area, 20);
        assert_eq!(
            set.regions[0].bounds,
            Rect {
                x: 3,
                y: 3,
                w: 5,
                h: 4
            }
        );
    }

    #[test]
    fn one_pixel_below_minimum_is_discarded() {
        let mut map = map_with_blocks(32, 32, &[(3, 3, 5, 4)]);
        // 한 픽셀 추가 → 21, 최소 22에서 버려짐
        map.set(8, 3);
        let set = RegionFilter::new(22).filter(&map);
        assert!(!set.any_region_present());
        assert_eq!(set.discarded, 1);
    }

    #[test]
    fn diagonal_pixels_are_connected() {
        let mut map = MotionMap::empty(8, 8);
        map.set(1, 1);
        map.set(2, 2);
        map.set(3, 3);
        let set = RegionFilter::new(3).filter(&map);
        assert_eq!(set.regions.len(), 1);
        assert_eq!(set.regions[0].area, 3);
    }

    #[test]
    fn regions_in_discovery_order() {
        let map = map_with_blocks(64, 64, &[(40, 2, 4, 4), (2, 30, 6, 6), (2, 2, 3, 3)]);
        let set = RegionFilter::new(1).filter(&map);
        let origins: Vec<(u32, u32)> = set
            .regions
            .iter()
            .map(|r| (r.bounds.x, r.bounds.y))
            .collect();
        // 래스터 순서: (2,2) → (40,2) → (2,30)
        assert_eq!(origins, vec![(2, 2), (40, 2), (2, 30)]);
    }

    #[test]
    fn small_noise_filtered_large_kept() {
        let map = map_with_blocks(64, 64, &[(1, 1, 2, 2), (20, 20, 10, 10), (50, 50, 1, 1)]);
        let set = RegionFilter::new(50).filter(&map);
        assert_eq!(set.regions.len(), 1);
        assert_eq!(set.regions[0].area, 100);
        assert_eq!(set.discarded, 2);
    }

    /// 두께 3의 40x40 사각 테두리
    fn ring_map() -> MotionMap {
        map_with_blocks(
            64,
            64,
            &[(10, 10, 40, 3), (10, 47, 40, 3), (10, 13, 3, 34), (47, 13, 3, 34)],
        )
    }

    #[test]
    fn hollow_ring_area_includes_interior() {
        let map = ring_map();
        assert_eq!(map.count(), 444);

        let set = RegionFilter::new(500).filter(&map);
        assert_eq!(set.regions.len(), 1);
        assert_eq!(set.regions[0].area, 1600);
        assert_eq!(
            set.regions[0].bounds,
            Rect {
                x: 10,
                y: 10,
                w: 40,
                h: 40
            }
        );
    }

    #[test]
    fn component_inside_hole_is_not_separate_region() {
        let mut map = ring_map();
        for y in 25..35 {
            for x in 25..35 {
                map.set(x, y);
            }
        }

        let set = RegionFilter::new(1).filter(&map);
        assert_eq!(set.regions.len(), 1);
        assert_eq!(set.regions[0].area, 1600);
        assert_eq!(set.discarded, 0);
    }

    #[test]
    fn gap_open_to_border_is_not_a_hole() {
        // 이미지 경계에 닿는 U자: 안쪽은 바깥 배경
        let map = map_with_blocks(16, 16, &[(0, 4, 10, 2), (0, 10, 10, 2), (8, 6, 2, 4)]);
        let set = RegionFilter::new(1).filter(&map);
        assert_eq!(set.regions.len(), 1);
        assert_eq!(set.regions[0].area, 48);
    }
}
