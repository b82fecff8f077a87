//! Background-pixel extraction and the pixel effects built on it.
//!
//! Mosaic and blur graphs do not draw shapes; they sample the rendered
//! background under their region at full device resolution, transform the
//! pixels, and write them back onto the annotation surface.

/// Side length of one mosaic cell in device pixels.
pub const MOSAIC_BLOCK_SIZE: usize = 16;

/// Blur radius in device pixels.
pub const BLUR_RADIUS: usize = 30;

/// Box passes used to approximate a gaussian kernel.
const BLUR_PASSES: usize = 3;

/// A rectangular block of straight-alpha RGBA pixels, 4 bytes per pixel,
/// rows tightly packed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBlock {
    pub width: u32,
    pub height: u32,
    /// Device-space position the block was read from; `(0, 0)` for blocks
    /// built in memory.
    pub origin: (i32, i32),
    pub data: Vec<u8>,
}

impl PixelBlock {
    /// Fully transparent block.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            origin: (0, 0),
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Wraps existing RGBA bytes. Returns `None` if the length does not match.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        (data.len() == width as usize * height as usize * 4).then_some(Self {
            width,
            height,
            origin: (0, 0),
            data,
        })
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.index(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = self.index(x, y);
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Copies a device-space region of `source` into a new block.
    ///
    /// Pixels outside `source` come back transparent. Returns `None` for an
    /// empty region or when Cairo cannot allocate the scratch surface.
    pub fn read_from(
        source: &cairo::ImageSurface,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Option<Self> {
        if width <= 0 || height <= 0 {
            return None;
        }

        let mut scratch =
            cairo::ImageSurface::create(cairo::Format::ARgb32, width, height).ok()?;
        {
            let ctx = cairo::Context::new(&scratch).ok()?;
            ctx.set_source_surface(source, -(x as f64), -(y as f64)).ok()?;
            ctx.set_operator(cairo::Operator::Source);
            ctx.paint().ok()?;
        }
        scratch.flush();

        let stride = scratch.stride() as usize;
        let data = scratch.data().ok()?;
        let mut block = PixelBlock::new(width as u32, height as u32);
        block.origin = (x, y);
        for row in 0..height as usize {
            for col in 0..width as usize {
                let offset = row * stride + col * 4;
                let argb = u32::from_ne_bytes([
                    data[offset],
                    data[offset + 1],
                    data[offset + 2],
                    data[offset + 3],
                ]);
                block.set_pixel(col as u32, row as u32, unpremultiply(argb));
            }
        }
        Some(block)
    }

    /// Converts the block into a Cairo ARGB32 surface.
    pub fn to_surface(&self) -> Result<cairo::ImageSurface, cairo::Error> {
        let stride = cairo::Format::ARgb32.stride_for_width(self.width)?;
        let mut bytes = vec![0u8; stride as usize * self.height as usize];
        for row in 0..self.height {
            for col in 0..self.width {
                let offset = row as usize * stride as usize + col as usize * 4;
                let argb = premultiply(self.pixel(col, row));
                bytes[offset..offset + 4].copy_from_slice(&argb.to_ne_bytes());
            }
        }
        cairo::ImageSurface::create_for_data(
            bytes,
            cairo::Format::ARgb32,
            self.width as i32,
            self.height as i32,
            stride,
        )
    }
}

fn unpremultiply(argb: u32) -> [u8; 4] {
    let a = (argb >> 24) & 0xff;
    let channel = |shift: u32| {
        let value = (argb >> shift) & 0xff;
        match a {
            0 => 0,
            255 => value as u8,
            _ => ((value * 255 + a / 2) / a).min(255) as u8,
        }
    };
    [channel(16), channel(8), channel(0), a as u8]
}

fn premultiply([r, g, b, a]: [u8; 4]) -> u32 {
    let a32 = a as u32;
    let channel = |value: u8| (value as u32 * a32 + 127) / 255;
    (a32 << 24) | (channel(r) << 16) | (channel(g) << 8) | channel(b)
}

/// Samples rendered background pixels under a logical rectangle.
pub trait BackgroundImageExtractor {
    /// Returns the block beneath `(x, y, width, height)` at full device
    /// resolution, or `None` if the region is empty or unreadable. The
    /// block's `origin` is the device position it was sampled at.
    fn image_data(&self, x: f64, y: f64, width: f64, height: f64) -> Option<PixelBlock>;
}

/// Extractor reading from a rendered background surface.
///
/// Created fresh for every annotation pass; the device pixel ratio is the
/// one in effect when the pass starts.
pub struct SurfaceExtractor<'a> {
    background: &'a cairo::ImageSurface,
    device_pixel_ratio: f64,
}

impl<'a> SurfaceExtractor<'a> {
    pub fn new(background: &'a cairo::ImageSurface, device_pixel_ratio: f64) -> Self {
        Self {
            background,
            device_pixel_ratio,
        }
    }
}

impl BackgroundImageExtractor for SurfaceExtractor<'_> {
    fn image_data(&self, x: f64, y: f64, width: f64, height: f64) -> Option<PixelBlock> {
        let dpr = self.device_pixel_ratio;
        let (sx, sy) = ((x * dpr).round(), (y * dpr).round());
        let (sw, sh) = ((width * dpr).round(), (height * dpr).round());
        log::trace!(
            "Extracting background ({x}, {y}, {width}x{height}) as device ({sx}, {sy}, {sw}x{sh})"
        );
        PixelBlock::read_from(
            self.background,
            sx as i32,
            sy as i32,
            sw as i32,
            sh as i32,
        )
    }
}

// ============================================================================
// Effects
// ============================================================================

/// Replaces every `block_size` square with the floor average of its R, G and
/// B channels. Partial squares at the edges average only their in-bounds
/// pixels. Alpha is untouched.
pub fn pixelate(block: &mut PixelBlock, block_size: usize) {
    let block_size = block_size.max(1) as u32;
    let (width, height) = (block.width, block.height);

    for cell_y in (0..height).step_by(block_size as usize) {
        for cell_x in (0..width).step_by(block_size as usize) {
            let x_end = (cell_x + block_size).min(width);
            let y_end = (cell_y + block_size).min(height);

            let mut sum = [0u64; 3];
            let mut count = 0u64;
            for y in cell_y..y_end {
                for x in cell_x..x_end {
                    let [r, g, b, _] = block.pixel(x, y);
                    sum[0] += r as u64;
                    sum[1] += g as u64;
                    sum[2] += b as u64;
                    count += 1;
                }
            }
            let average = sum.map(|total| (total / count) as u8);

            for y in cell_y..y_end {
                for x in cell_x..x_end {
                    let [_, _, _, a] = block.pixel(x, y);
                    block.set_pixel(x, y, [average[0], average[1], average[2], a]);
                }
            }
        }
    }
}

/// Smooths all four channels with repeated box passes approximating a
/// gaussian of the given radius. Edges repeat the border pixel.
pub fn blur(block: &mut PixelBlock, radius: usize) {
    if block.width == 0 || block.height == 0 || radius == 0 {
        return;
    }
    let box_radius = (radius / BLUR_PASSES).max(1);
    let (width, height) = (block.width as usize, block.height as usize);
    let mut scratch = vec![0u8; block.data.len()];

    for _ in 0..BLUR_PASSES {
        box_pass(&block.data, &mut scratch, width, height, box_radius, true);
        box_pass(&scratch, &mut block.data, width, height, box_radius, false);
    }
}

fn box_pass(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    height: usize,
    radius: usize,
    horizontal: bool,
) {
    let (lines, len) = if horizontal {
        (height, width)
    } else {
        (width, height)
    };
    let index = |line: usize, pos: usize, channel: usize| {
        let (x, y) = if horizontal { (pos, line) } else { (line, pos) };
        (y * width + x) * 4 + channel
    };
    let window = (2 * radius + 1) as u32;
    let last = len as isize - 1;
    let clamp = |pos: isize| pos.clamp(0, last) as usize;

    for line in 0..lines {
        for channel in 0..4 {
            let mut sum: u32 = (-(radius as isize)..=radius as isize)
                .map(|offset| src[index(line, clamp(offset), channel)] as u32)
                .sum();
            for pos in 0..len {
                dst[index(line, pos, channel)] = ((sum + window / 2) / window) as u8;
                let entering = clamp(pos as isize + radius as isize + 1);
                let leaving = clamp(pos as isize - radius as isize);
                sum += src[index(line, entering, channel)] as u32;
                sum -= src[index(line, leaving, channel)] as u32;
            }
        }
    }
}

/// The transform a pixel-effect graph applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelEffect {
    Pixelate { block_size: usize },
    Blur { radius: usize },
}

impl PixelEffect {
    pub fn apply(self, block: &mut PixelBlock) {
        match self {
            PixelEffect::Pixelate { block_size } => pixelate(block, block_size),
            PixelEffect::Blur { radius } => blur(block, radius),
        }
    }
}

/// Extracts the background under a logical region, transforms it and writes
/// it back onto `ctx`'s surface in device space.
pub fn render_pixel_effect(
    ctx: &cairo::Context,
    extractor: &dyn BackgroundImageExtractor,
    (x, y, width, height): (f64, f64, f64, f64),
    effect: PixelEffect,
) {
    let Some(mut block) = extractor.image_data(x, y, width, height) else {
        log::error!("Failed to get image data from region ({x}, {y}, {width}x{height})");
        return;
    };

    effect.apply(&mut block);

    let (dx, dy) = block.origin;
    if let Err(err) = put_pixel_block(ctx, &block, dx as f64, dy as f64) {
        log::warn!("Failed to write {:?} pixels back: {}", effect, err);
    }
}

/// Writes a block at a device-space position, replacing what is there.
///
/// The context's transform and compositing operator are ignored.
pub fn put_pixel_block(
    ctx: &cairo::Context,
    block: &PixelBlock,
    dx: f64,
    dy: f64,
) -> Result<(), cairo::Error> {
    let surface = block.to_surface()?;
    ctx.save()?;
    ctx.identity_matrix();
    ctx.set_operator(cairo::Operator::Source);
    ctx.set_source_surface(&surface, dx, dy)?;
    ctx.rectangle(dx, dy, block.width as f64, block.height as f64);
    let filled = ctx.fill();
    ctx.restore()?;
    filled
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED_PX: [u8; 4] = [255, 0, 0, 255];
    const BLUE_PX: [u8; 4] = [0, 0, 255, 255];

    fn checkerboard(size: u32) -> PixelBlock {
        let mut block = PixelBlock::new(size, size);
        for y in 0..size {
            for x in 0..size {
                let px = if (x + y) % 2 == 0 { RED_PX } else { BLUE_PX };
                block.set_pixel(x, y, px);
            }
        }
        block
    }

    #[test]
    fn pixelate_makes_each_cell_its_mean() {
        let mut block = checkerboard(32);
        pixelate(&mut block, MOSAIC_BLOCK_SIZE);

        // 128 red and 128 blue pixels per cell: floor(255 * 128 / 256) = 127
        for y in 0..32 {
            for x in 0..32 {
                assert_eq!(block.pixel(x, y), [127, 0, 127, 255], "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn pixelate_keeps_solid_cells_unchanged() {
        let mut block = PixelBlock::new(32, 32);
        for y in 0..32 {
            for x in 0..32 {
                let cell = (x / 16 + y / 16) % 2;
                block.set_pixel(x, y, if cell == 0 { RED_PX } else { BLUE_PX });
            }
        }
        let expected = block.clone();

        pixelate(&mut block, MOSAIC_BLOCK_SIZE);

        assert_eq!(block, expected);
    }

    #[test]
    fn pixelate_averages_partial_cells_over_in_bounds_pixels() {
        // 18 columns: the second cell is only 2 pixels wide
        let mut block = PixelBlock::new(18, 1);
        for x in 0..18 {
            block.set_pixel(x, 0, [0, 0, 0, 255]);
        }
        block.set_pixel(16, 0, [100, 50, 10, 255]);
        block.set_pixel(17, 0, [200, 150, 30, 255]);

        pixelate(&mut block, MOSAIC_BLOCK_SIZE);

        assert_eq!(block.pixel(16, 0), [150, 100, 20, 255]);
        assert_eq!(block.pixel(17, 0), [150, 100, 20, 255]);
        assert_eq!(block.pixel(0, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn blur_leaves_uniform_blocks_alone() {
        let mut block = PixelBlock::new(20, 10);
        for y in 0..10 {
            for x in 0..20 {
                block.set_pixel(x, y, [40, 80, 120, 255]);
            }
        }
        let expected = block.clone();
        blur(&mut block, BLUR_RADIUS);
        assert_eq!(block, expected);
    }

    #[test]
    fn blur_softens_hard_edges() {
        let mut block = PixelBlock::new(40, 1);
        for x in 0..40 {
            let px = if x < 20 { [0, 0, 0, 255] } else { [255, 255, 255, 255] };
            block.set_pixel(x, 0, px);
        }

        blur(&mut block, 9);

        let [left, ..] = block.pixel(19, 0);
        let [right, ..] = block.pixel(20, 0);
        assert!(left > 0 && left < 255, "left of edge is {left}");
        assert!(right > 0 && right < 255, "right of edge is {right}");
        assert!(left < right);
    }

    #[test]
    fn surface_round_trip_preserves_opaque_pixels() {
        let block = checkerboard(4);
        let surface = block.to_surface().expect("surface");
        let read = PixelBlock::read_from(&surface, 0, 0, 4, 4).expect("read back");
        assert_eq!(read, block);
    }

    #[test]
    fn extractor_scales_requests_by_device_pixel_ratio() {
        let background =
            cairo::ImageSurface::create(cairo::Format::ARgb32, 100, 100).expect("surface");
        let extractor = SurfaceExtractor::new(&background, 2.0);
        let block = extractor.image_data(5.0, 5.0, 10.0, 7.5).expect("block");
        assert_eq!((block.width, block.height), (20, 15));
        assert_eq!(block.origin, (10, 10));
        assert!(extractor.image_data(0.0, 0.0, 0.0, 5.0).is_none());
    }

    #[test]
    fn put_pixel_block_ignores_context_scale() {
        let target =
            cairo::ImageSurface::create(cairo::Format::ARgb32, 8, 8).expect("surface");
        {
            let ctx = cairo::Context::new(&target).expect("context");
            ctx.scale(2.0, 2.0);
            let mut block = PixelBlock::new(2, 2);
            for y in 0..2 {
                for x in 0..2 {
                    block.set_pixel(x, y, RED_PX);
                }
            }
            put_pixel_block(&ctx, &block, 4.0, 4.0).expect("write");
        }

        let read = PixelBlock::read_from(&target, 0, 0, 8, 8).expect("read");
        assert_eq!(read.pixel(4, 4), RED_PX);
        assert_eq!(read.pixel(5, 5), RED_PX);
        assert_eq!(read.pixel(6, 6), [0, 0, 0, 0]);
        assert_eq!(read.pixel(3, 3), [0, 0, 0, 0]);
    }
}
