use std::sync::Arc;

use vello_cpu::kurbo::{Affine, Rect};

use crate::foundation::core::Canvas;
use crate::foundation::error::{QuoteError, QuoteResult};
use crate::preview::region::{PreviewRegion, TextAlign};
use crate::render::backend::FrameRGBA;
use crate::render::text::{TextBrushRgba8, TextLayoutEngine};
use crate::snapshot::{CrossOrigin, SnapshotOpts};
use crate::style::color::Rgba;
use crate::style::image::BackgroundImage;

#[derive(Clone, Debug, PartialEq)]
struct LayoutKey {
    text: String,
    font_id: u64,
    size_px_bits: u32,
    max_width_bits: u32,
    color: [u8; 4],
}

#[derive(Clone)]
struct CaptionCache {
    key: LayoutKey,
    layout: Arc<parley::Layout<TextBrushRgba8>>,
    font: vello_cpu::peniko::FontData,
}

#[derive(Clone)]
struct ImagePaint {
    source: usize,
    paint: vello_cpu::Image,
}

/// Rasterizes a [`PreviewRegion`] with `vello_cpu`.
///
/// Paint order: optional white base, background color, background image (cover, centered),
/// overlay, animated caption.
#[derive(Default)]
pub struct PreviewRenderer {
    text_engine: TextLayoutEngine,
    caption_cache: Option<CaptionCache>,
    image_cache: Option<ImagePaint>,
}

impl PreviewRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the region as it currently looks into a premultiplied RGBA8 frame.
    pub fn render(&mut self, region: &PreviewRegion, opts: &SnapshotOpts) -> QuoteResult<FrameRGBA> {
        opts.validate()?;
        region.size.validate()?;
        let out = region.size.scaled(opts.scale);
        let (w16, h16) = to_u16_dims(out)?;

        let css_w = f64::from(region.size.width);
        let css_h = f64::from(region.size.height);
        let base = Affine::scale(f64::from(opts.scale));
        let region_rect = Rect::new(0.0, 0.0, css_w, css_h);

        let mut ctx = vello_cpu::RenderContext::new(w16, h16);
        ctx.set_paint_transform(Affine::IDENTITY);

        if !opts.transparent_background {
            ctx.set_transform(Affine::IDENTITY);
            ctx.set_paint(Rgba::WHITE.to_paint());
            ctx.fill_rect(&Rect::new(0.0, 0.0, f64::from(out.width), f64::from(out.height)));
        }

        ctx.set_transform(base);
        if let Some(bg) = region.background_color.filter(|c| !c.is_transparent()) {
            ctx.set_paint(bg.to_paint());
            ctx.fill_rect(&region_rect);
        }

        if let Some(img) = region.background_image.as_ref() {
            if !img.is_embedded() && opts.cross_origin == CrossOrigin::Anonymous {
                tracing::warn!("skipping linked background image in anonymous cross-origin mode");
            } else {
                let paint = self.image_paint_for(img)?;
                let s = (css_w / f64::from(img.width)).max(css_h / f64::from(img.height));
                let dx = (css_w - f64::from(img.width) * s) / 2.0;
                let dy = (css_h - f64::from(img.height) * s) / 2.0;
                ctx.set_transform(base * Affine::translate((dx, dy)) * Affine::scale(s));
                ctx.set_paint(paint);
                ctx.fill_rect(&Rect::new(
                    0.0,
                    0.0,
                    f64::from(img.width),
                    f64::from(img.height),
                ));
                ctx.set_transform(base);
            }
        }

        if let Some(overlay) = region.overlay.filter(|c| !c.is_transparent()) {
            ctx.set_paint(overlay.to_paint());
            ctx.fill_rect(&region_rect);
        }

        self.draw_caption(region, base, &mut ctx)?;

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
        ctx.render_to_pixmap(&mut pixmap);

        Ok(FrameRGBA {
            width: out.width,
            height: out.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn draw_caption(
        &mut self,
        region: &PreviewRegion,
        base: Affine,
        ctx: &mut vello_cpu::RenderContext,
    ) -> QuoteResult<()> {
        let Some(text) = region.caption() else {
            return Ok(());
        };
        let style = &region.caption_style;
        let font = &style.font;

        let css_w = f64::from(region.size.width);
        let css_h = f64::from(region.size.height);
        let block_w = (css_w * f64::from(style.max_width_frac.clamp(0.05, 1.0))).max(1.0);

        let key = LayoutKey {
            text: text.to_owned(),
            font_id: font.id(),
            size_px_bits: style.font_size_px.to_bits(),
            max_width_bits: (block_w as f32).to_bits(),
            color: style.color.to_rgba8(),
        };
        let cached = self
            .caption_cache
            .as_ref()
            .filter(|c| c.key == key)
            .cloned();
        let cache = match cached {
            Some(c) => c,
            None => {
                let [r, g, b, a] = key.color;
                let layout = self.text_engine.layout_plain(
                    text,
                    font,
                    style.font_size_px,
                    TextBrushRgba8 { r, g, b, a },
                    block_w as f32,
                )?;
                let data = vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(font.bytes().as_ref().clone()),
                    0,
                );
                let c = CaptionCache {
                    key,
                    layout: Arc::new(layout),
                    font: data,
                };
                self.caption_cache = Some(c.clone());
                c
            }
        };

        let block_h = f64::from(cache.layout.height());
        let anim = region.caption_animation_frame();
        let opacity = anim.opacity.clamp(0.0, 1.0) as f32;
        if opacity <= 0.0 {
            return Ok(());
        }

        let origin_x = (css_w - block_w) / 2.0 + anim.translate.x * block_w;
        let origin_y = (css_h - block_h) / 2.0 + anim.translate.y * block_h;
        let block_tr = base
            * Affine::translate((origin_x, origin_y))
            * Affine::translate((block_w / 2.0, block_h / 2.0))
            * Affine::scale(anim.scale.max(0.0))
            * Affine::translate((-block_w / 2.0, -block_h / 2.0));

        if opacity < 1.0 {
            ctx.push_opacity_layer(opacity);
        }
        for line in cache.layout.lines() {
            let advance = f64::from(line.metrics().advance);
            let line_dx = match style.align {
                TextAlign::Left => 0.0,
                TextAlign::Center => (block_w - advance) / 2.0,
                TextAlign::Right => block_w - advance,
            };
            ctx.set_transform(block_tr * Affine::translate((line_dx, 0.0)));
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&cache.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        if opacity < 1.0 {
            ctx.pop_layer();
        }
        ctx.set_transform(base);
        Ok(())
    }

    fn image_paint_for(&mut self, img: &BackgroundImage) -> QuoteResult<vello_cpu::Image> {
        let source = Arc::as_ptr(&img.rgba8_premul) as usize;
        if let Some(p) = self.image_cache.as_ref().filter(|p| p.source == source) {
            return Ok(p.paint.clone());
        }
        let pixmap = pixmap_from_premul_bytes(&img.rgba8_premul, img.width, img.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.image_cache = Some(ImagePaint {
            source,
            paint: paint.clone(),
        });
        Ok(paint)
    }
}

fn to_u16_dims(c: Canvas) -> QuoteResult<(u16, u16)> {
    let w: u16 = c
        .width
        .try_into()
        .map_err(|_| QuoteError::snapshot("output width exceeds u16"))?;
    let h: u16 = c
        .height
        .try_into()
        .map_err(|_| QuoteError::snapshot("output height exceeds u16"))?;
    Ok((w, h))
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> QuoteResult<vello_cpu::Pixmap> {
    let (w, h) = to_u16_dims(Canvas { width, height })?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(QuoteError::snapshot("pixmap byte len mismatch"));
    }
    let mut may_have_opacities = false;
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
