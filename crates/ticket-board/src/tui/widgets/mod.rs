pub(super) mod digits;
pub(super) mod tile;

pub(super) use tile::TileWidget;
