//! Layout constants, color slots and behavior switches.
//!
//! Every size the engine reasons about is derived from an [`EditorConfig`].
//! The defaults reproduce the stock block look (100×100 blocks, 25px
//! margins, diamond top/bottom clips and round left/right clips).

use slint::Color;

/// Configuration for a [`BlockGraph`](crate::BlockGraph).
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Spacing around and between content elements.
    pub margin: f32,
    /// Stroke width of block and connector outlines.
    pub border_size: f32,

    /// Body size of a freshly created block.
    pub block_width: f32,
    pub block_height: f32,
    /// Vertical offset of the content row below the block's top edge.
    pub header_offset: f32,

    /// Side of the square top/bottom clip before its 45° rotation.
    pub tb_clip_size: f32,
    /// Height a bottom clip adds below the body.
    pub tb_clip_adjust: f32,
    /// Horizontal position of top/bottom clips.
    pub tb_clip_x: f32,

    pub lr_clip_radius: f32,
    /// Width a left clip reserves and the overlap between horizontally joined blocks.
    pub lr_clip_width: f32,

    /// Body size of an empty slot.
    pub slot_width: f32,
    pub slot_height: f32,

    pub operator_width: f32,
    pub operator_height: f32,
    pub operator_y: f32,

    pub pipe_radius: f32,

    pub block_color: Color,
    pub highlight_color: Color,
    pub border_color: Color,
    pub operator_color: Color,
    pub slot_color: Color,

    /// Run the chain containing a dragged block when it is released.
    pub run_chain_on_release: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            margin: 25.0,
            border_size: 2.0,
            block_width: 100.0,
            block_height: 100.0,
            header_offset: 25.0,
            tb_clip_size: 25.0,
            tb_clip_adjust: 17.5,
            tb_clip_x: 25.0,
            lr_clip_radius: 8.0,
            lr_clip_width: 14.0,
            slot_width: 40.0,
            slot_height: 50.0,
            operator_width: 25.0,
            operator_height: 30.0,
            operator_y: 10.0,
            pipe_radius: 16.0,
            block_color: Color::from_rgb_u8(0x29, 0xab, 0xe2),
            highlight_color: Color::from_rgb_u8(0xff, 0xa5, 0x00),
            border_color: Color::from_rgb_u8(0, 0, 0),
            operator_color: Color::from_rgb_u8(0xe6, 0xe6, 0xe6),
            slot_color: Color::from_rgb_u8(0xff, 0xff, 0xff),
            run_chain_on_release: true,
        }
    }
}

impl EditorConfig {
    /// Side of the axis-aligned box around a rotated top/bottom clip.
    pub fn tb_clip_extent(&self) -> f32 {
        self.tb_clip_size * std::f32::consts::SQRT_2
    }

    /// Diameter (plus stroke) of a left/right clip.
    pub fn lr_clip_extent(&self) -> f32 {
        self.lr_clip_radius * 2.0 + self.border_size
    }

    /// Diameter (plus stroke) of a pipe connector.
    pub fn pipe_extent(&self) -> f32 {
        self.pipe_radius * 2.0 + self.border_size
    }
}
