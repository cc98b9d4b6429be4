//! Bundled sample catalog used to seed a fresh database.

use crate::snapshot::{CategoryBlock, DayField, SnapshotDocument, SnapshotMeta};

/// Sample catalog matching the data the assistant originally shipped with.
///
/// The first block deliberately keeps the legacy single-literal `date` form
/// so seeding also exercises the backward-compatible decode path.
#[must_use]
pub fn default_snapshot() -> SnapshotDocument {
    SnapshotDocument {
        metadata: SnapshotMeta::default(),
        categories: vec![
            CategoryBlock {
                name: "可燃ゴミ".to_owned(),
                date: DayField::One("Monday".to_owned()),
                method: "専用ゴミ袋に入れて出してください".to_owned(),
                special_days: vec!["2024-04-11".to_owned(), "2024-04-25".to_owned()],
                notion: Some("生ごみは水気をよく切ってから出してください".to_owned()),
                garbage_types: vec![
                    "生ごみ".to_owned(),
                    "紙くず".to_owned(),
                    "木くず".to_owned(),
                ],
            },
            CategoryBlock {
                name: "不燃ゴミ".to_owned(),
                date: DayField::Many(vec!["Wednesday".to_owned()]),
                method: "透明または半透明の袋に入れて出してください".to_owned(),
                special_days: Vec::new(),
                notion: Some("金属類は分別してください".to_owned()),
                garbage_types: vec![
                    "金属類".to_owned(),
                    "ガラス".to_owned(),
                    "陶器".to_owned(),
                ],
            },
            CategoryBlock {
                name: "プラスチック".to_owned(),
                date: DayField::Many(vec!["Friday".to_owned()]),
                method: "プラマークの付いた容器のみ".to_owned(),
                special_days: Vec::new(),
                notion: Some("汚れを落としてから出してください".to_owned()),
                garbage_types: vec!["プラスチック容器".to_owned()],
            },
            CategoryBlock {
                name: "資源ゴミ".to_owned(),
                date: DayField::Many(vec!["Saturday".to_owned()]),
                method: "種類別に分けて出してください".to_owned(),
                special_days: Vec::new(),
                notion: Some("ペットボトル、缶、ビンを分別".to_owned()),
                garbage_types: vec![
                    "ペットボトル".to_owned(),
                    "空き缶".to_owned(),
                    "ビン".to_owned(),
                ],
            },
        ],
    }
}
