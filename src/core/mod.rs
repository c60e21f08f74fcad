pub mod data;
pub mod hierarchy;
pub mod intensity;
pub mod labels;
pub mod marks;
pub mod normalize;
pub mod scale;
pub mod topology;
pub mod types;

pub use data::{AttrValue, Attribute, DataPoint, PointKey};
pub use hierarchy::{HierarchyNode, PositionedLeaf, TileRect, partition_hierarchy};
pub use intensity::{IntensityRange, color_or_opacity_for, legend_ticks};
pub use marks::{
    CategoryColorPolicy, Mark, MarkKey, MarkShape, MarkSpec, ScaleSet, build_marks,
    build_tile_marks,
};
pub use normalize::{AttrKind, AttributeField, FieldMapping, FieldPath, normalize};
pub use scale::{
    AxisSpec, BandScale, ContinuousKind, ContinuousScale, Scale, ValueField, derive_scale, extent,
    nice_ticks,
};
pub use topology::{RegionFeature, Ring, Topology};
pub use types::{Padding, PlotArea, PointerPosition, Viewport};
