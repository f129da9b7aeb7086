/// 知名怪物參考表
///
/// 狩獵等級集合在啟動時由靜態資料建立一次，之後唯讀共享
use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// 優雷卡知名怪物
pub const EUREKA_MOBS: [u32; 4] = [7184, 7567, 7764, 8131];

/// FATE 知名怪物
pub const FATE_MOBS: [u32; 10] = [882, 733, 7422, 7415, 10573, 10157, 13677, 13515, 16863, 17387];

/// 狩獵等級
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HuntRank {
    S,
    A,
    B,
}

impl HuntRank {
    /// 資料表中的等級數值（3 = S、2 = A、1 = B）
    pub fn from_raw(rank: u8) -> Option<Self> {
        match rank {
            3 => Some(HuntRank::S),
            2 => Some(HuntRank::A),
            1 => Some(HuntRank::B),
            _ => None,
        }
    }
}

/// 知名怪物資料列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotoriousMonsterRow {
    pub rank: u8,
    pub bnpc_base: u32,
}

#[derive(Debug, Default, Deserialize)]
struct RankTableFile {
    #[serde(default)]
    monsters: Vec<NotoriousMonsterRow>,
}

/// 狩獵等級與知名怪物集合
#[derive(Debug, Clone, Default)]
pub struct RankTables {
    s_rank: HashSet<u32>,
    a_rank: HashSet<u32>,
    b_rank: HashSet<u32>,
    eureka: HashSet<u32>,
    fate: HashSet<u32>,
}

impl RankTables {
    /// 由資料列建立，忽略 bnpc_base 為 0 的列
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = NotoriousMonsterRow>,
    {
        let mut tables = Self {
            eureka: EUREKA_MOBS.into_iter().collect(),
            fate: FATE_MOBS.into_iter().collect(),
            ..Self::default()
        };

        for row in rows {
            if row.bnpc_base == 0 {
                continue;
            }
            match HuntRank::from_raw(row.rank) {
                Some(HuntRank::S) => tables.s_rank.insert(row.bnpc_base),
                Some(HuntRank::A) => tables.a_rank.insert(row.bnpc_base),
                Some(HuntRank::B) => tables.b_rank.insert(row.bnpc_base),
                None => false,
            };
        }

        log::debug!(
            "狩獵等級表已建立 - S: {}, A: {}, B: {}",
            tables.s_rank.len(),
            tables.a_rank.len(),
            tables.b_rank.len()
        );
        tables
    }

    /// 沒有狩獵資料、只含固定知名怪物的表
    pub fn builtin() -> Self {
        Self::from_rows(std::iter::empty())
    }

    /// 從 TOML 檔案載入 `[[monsters]]` 資料列
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("無法讀取狩獵等級表: {}", path.display()))?;
        let file: RankTableFile = toml::from_str(&content)
            .with_context(|| format!("無法解析狩獵等級表: {}", path.display()))?;

        log::info!("已載入狩獵等級表: {} ({} 列)", path.display(), file.monsters.len());
        Ok(Self::from_rows(file.monsters))
    }

    /// 查詢狩獵等級
    pub fn hunt_rank(&self, base_id: u32) -> Option<HuntRank> {
        if self.s_rank.contains(&base_id) {
            Some(HuntRank::S)
        } else if self.a_rank.contains(&base_id) {
            Some(HuntRank::A)
        } else if self.b_rank.contains(&base_id) {
            Some(HuntRank::B)
        } else {
            None
        }
    }

    pub fn is_eureka(&self, base_id: u32) -> bool {
        self.eureka.contains(&base_id)
    }

    pub fn is_fate(&self, base_id: u32) -> bool {
        self.fate.contains(&base_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(rank: u8, bnpc_base: u32) -> NotoriousMonsterRow {
        NotoriousMonsterRow { rank, bnpc_base }
    }

    #[test]
    fn test_ranks_from_rows() {
        let tables = RankTables::from_rows([row(3, 100), row(2, 200), row(1, 300), row(1, 300)]);
        assert_eq!(tables.hunt_rank(100), Some(HuntRank::S));
        assert_eq!(tables.hunt_rank(200), Some(HuntRank::A));
        assert_eq!(tables.hunt_rank(300), Some(HuntRank::B));
        assert_eq!(tables.hunt_rank(400), None);
    }

    #[test]
    fn test_zero_base_and_unknown_rank_ignored() {
        let tables = RankTables::from_rows([row(3, 0), row(7, 500)]);
        assert_eq!(tables.hunt_rank(0), None);
        assert_eq!(tables.hunt_rank(500), None);
    }

    #[test]
    fn test_builtin_sets() {
        let tables = RankTables::builtin();
        assert!(tables.is_eureka(7184));
        assert!(tables.is_fate(17387));
        assert!(!tables.is_fate(7184));
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!("radar_ranks_{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[[monsters]]\nrank = 3\nbnpc_base = 4242\n\n[[monsters]]\nrank = 1\nbnpc_base = 77\n",
        )
        .unwrap();

        let tables = RankTables::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(tables.hunt_rank(4242), Some(HuntRank::S));
        assert_eq!(tables.hunt_rank(77), Some(HuntRank::B));
    }

    #[test]
    fn test_from_missing_file_is_error() {
        assert!(RankTables::from_file("/nonexistent/radar_ranks.toml").is_err());
    }
}
