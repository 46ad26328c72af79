//! # 검출기별 맵 캐시
//!
//! 잡음/분산 맵 같은 파생 맵을 검출기 이름으로 보관한다.
//! 재생성 여부는 호출자가 `force_rebuild` 로 명시한다.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use ndarray::Array1;

use crate::core::systems::errors::SphereResult;

#[derive(Debug, Clone, Default)]
pub struct MapCache {
    maps: HashMap<String, Arc<Array1<f64>>>,
}

impl MapCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 캐시에 있으면 재사용, 없거나 `force_rebuild` 면 `builder` 로 새로 만든다.
    /// 생성에 실패하면 기존 항목은 그대로 남는다.
    pub fn get_or_build<F>(
        &mut self,
        key: &str,
        force_rebuild: bool,
        builder: F,
    ) -> SphereResult<Arc<Array1<f64>>>
    where
        F: FnOnce() -> SphereResult<Array1<f64>>,
    {
        if !force_rebuild {
            if let Some(map) = self.maps.get(key) {
                debug!("맵 캐시 적중: {}", key);
                return Ok(Arc::clone(map));
            }
        }
        let map = Arc::new(builder()?);
        debug!("맵 생성: {} ({} 화소)", key, map.len());
        self.maps.insert(key.to_string(), Arc::clone(&map));
        Ok(map)
    }

    pub fn get(&self, key: &str) -> Option<Arc<Array1<f64>>> {
        self.maps.get(key).cloned()
    }

    pub fn invalidate(&mut self, key: &str) -> bool {
        self.maps.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.maps.clear();
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}
