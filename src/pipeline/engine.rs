use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::Rgb;
use tracing::{debug, info, warn};

use crate::{
    canvas::{AnimatedCanvas, Canvas, StaticCanvas, SUPERSAMPLE},
    config::{AnimationConfig, Config, StripConfig},
    encode::{write_png, GifOptimizer, GifWriter, Optimization},
    error::{InputError, Result},
    layout::{ChunkPlan, LayoutResolver, LinearLayout, PositionalLayout},
    pipeline::progress::FileProgress,
    source::{Frame, FrameSource, LocationTable},
};

/// What one finished job produced
#[derive(Debug, Clone)]
pub struct RenderSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub frames: usize,
    /// Output size in pixels
    pub dimensions: (u32, u32),
    /// Static output: number of side-by-side chunks
    pub columns: Option<u32>,
    /// Animated output: result of the optimizer pass
    pub optimization: Option<Optimization>,
}

/// A per-file pipeline: render log in, one image file out.
///
/// Implementations hold only read-only state so one instance can serve every
/// worker of a run.
pub trait Renderer: Send + Sync {
    /// Short label for logs and progress bars
    fn name(&self) -> &str;

    /// Where the artifact for `input` is written
    fn output_path(&self, input: &Path) -> PathBuf;

    /// Render `input` into `output`
    fn render(&self, input: &Path, output: &Path, progress: &FileProgress) -> Result<RenderSummary>;
}

/// Paint every LED of `frame` at the cell the layout picks for it
pub fn paint_frame<C, L>(canvas: &mut C, layout: &L, frame: &Frame) -> Result<()>
where
    C: Canvas + ?Sized,
    L: LayoutResolver + ?Sized,
{
    for (led, color) in frame.leds() {
        let (x, y) = layout.coordinates(frame.index(), led)?;
        canvas.paint(x, y, color)?;
    }
    Ok(())
}

/// Output path for `input`: its file name minus the last `suffix_len`
/// characters, with `extension` appended, in `dir` or next to the input.
///
/// Names no longer than the suffix are used whole.
pub fn output_path_for(input: &Path, suffix_len: usize, extension: &str, dir: Option<&Path>) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let char_count = name.chars().count();
    let base: String = if char_count > suffix_len {
        name.chars().take(char_count - suffix_len).collect()
    } else {
        name
    };

    let file_name = format!("{}.{}", base, extension);
    match dir {
        Some(dir) => dir.join(file_name),
        None => input.with_file_name(file_name),
    }
}

/// File name used to label an input in logs and progress bars
pub(crate) fn display_name(input: &Path) -> String {
    input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string())
}

fn open_source(input: &Path, num_leds: usize) -> Result<FrameSource> {
    let source = FrameSource::open(input, num_leds)?;
    if source.frame_count() == 0 {
        return Err(InputError::EmptyInput {
            path: input.display().to_string(),
        }
        .into());
    }
    Ok(source)
}

// ==========================================
// ANIMATED OUTPUT
// ==========================================

/// Renders a log into a looping GIF using fixed LED positions
pub struct AnimationRenderer {
    config: AnimationConfig,
    layout: PositionalLayout,
    optimizer: GifOptimizer,
    output_dir: Option<PathBuf>,
}

impl AnimationRenderer {
    pub fn new(config: &Config, locations: Arc<LocationTable>) -> Self {
        if locations.len() < config.animation.num_leds() {
            warn!(
                "Location table has {} entries but frames carry {} LEDs",
                locations.len(),
                config.animation.num_leds()
            );
        }

        Self {
            config: config.animation.clone(),
            layout: PositionalLayout::new(locations),
            optimizer: GifOptimizer::new(config.output.optimizer.clone()),
            output_dir: config.output.dir.clone(),
        }
    }

    fn render_frames(&self, input: &Path, output: &Path, progress: &FileProgress) -> Result<usize> {
        let source = open_source(input, self.config.num_leds())?;
        progress.set_total(source.frame_count());

        let writer = GifWriter::create(
            output,
            self.config.width * SUPERSAMPLE,
            self.config.height * SUPERSAMPLE,
            self.config.frame_delay(),
            self.config.quantize_speed,
        )?;

        let result = self.stream_frames(source, writer, progress);
        if result.is_err() {
            if let Err(e) = std::fs::remove_file(output) {
                warn!("Could not remove partial {:?}: {}", output, e);
            }
        }
        result
    }

    fn stream_frames(&self, source: FrameSource, writer: GifWriter, progress: &FileProgress) -> Result<usize> {
        let mut canvas = AnimatedCanvas::new(self.config.width, self.config.height, writer);

        for frame in source.frames() {
            let frame = frame?;
            paint_frame(&mut canvas, &self.layout, &frame)?;
            canvas.commit_frame()?;
            progress.inc(1);
        }

        let frames = canvas.committed();
        canvas.into_sink().finish()?;
        Ok(frames)
    }
}

impl Renderer for AnimationRenderer {
    fn name(&self) -> &str {
        "gif"
    }

    fn output_path(&self, input: &Path) -> PathBuf {
        output_path_for(input, self.config.suffix_len, "gif", self.output_dir.as_deref())
    }

    fn render(&self, input: &Path, output: &Path, progress: &FileProgress) -> Result<RenderSummary> {
        debug!("Animating {:?} -> {:?}", input, output);

        let frames = self.render_frames(input, output, progress)?;

        let optimization = self.optimizer.optimize(output)?;
        if let Optimization::Optimized { before, after } = optimization {
            debug!("{:?}: {} KB -> {} KB", output, before / 1024, after / 1024);
        }

        info!("Wrote {:?} ({} frames)", output, frames);
        Ok(RenderSummary {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            frames,
            dimensions: (self.config.width * SUPERSAMPLE, self.config.height * SUPERSAMPLE),
            columns: None,
            optimization: Some(optimization),
        })
    }
}

// ==========================================
// STATIC OUTPUT
// ==========================================

/// Renders a log into a PNG with one pixel row per frame
pub struct StripRenderer {
    config: StripConfig,
    output_dir: Option<PathBuf>,
}

impl StripRenderer {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.strip.clone(),
            output_dir: config.output.dir.clone(),
        }
    }

    /// Paint the whole log into a canvas sized by the chunk plan
    pub fn paint_log(&self, source: FrameSource, progress: &FileProgress) -> Result<(StaticCanvas, ChunkPlan)> {
        let plan = ChunkPlan::plan(
            source.frame_count(),
            self.config.num_leds,
            self.config.gutter_width,
            self.config.height,
        )?;
        debug!(
            "{} frames -> {} column(s) of {} rows, {}px wide",
            plan.total_frames(),
            plan.columns(),
            plan.height(),
            plan.width()
        );

        let layout = LinearLayout::new(plan);
        let gutter = Rgb(self.config.gutter_color);
        let mut canvas = StaticCanvas::new(plan.width(), plan.height());

        for frame in source.frames() {
            let frame = frame?;
            paint_frame(&mut canvas, &layout, &frame)?;
            if plan.is_multi_column() {
                canvas.fill_span(plan.gutter_span(frame.index()), plan.row(frame.index()), gutter)?;
            }
            progress.inc(1);
        }

        Ok((canvas, plan))
    }
}

impl Renderer for StripRenderer {
    fn name(&self) -> &str {
        "png"
    }

    fn output_path(&self, input: &Path) -> PathBuf {
        output_path_for(input, self.config.suffix_len, "png", self.output_dir.as_deref())
    }

    fn render(&self, input: &Path, output: &Path, progress: &FileProgress) -> Result<RenderSummary> {
        debug!("Stacking {:?} -> {:?}", input, output);

        let source = open_source(input, self.config.num_leds)?;
        let frames = source.frame_count();
        progress.set_total(frames);

        let (canvas, plan) = self.paint_log(source, progress)?;
        write_png(canvas.as_image(), output)?;

        info!("Wrote {:?} ({} frames, {} column(s))", output, frames, plan.columns());
        Ok(RenderSummary {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            frames,
            dimensions: (plan.width(), plan.height()),
            columns: Some(plan.columns()),
            optimization: None,
        })
    }
}

/// Shared entry point used by the dispatcher
pub(crate) fn render_one(renderer: &dyn Renderer, input: &Path, progress: &FileProgress) -> Result<RenderSummary> {
    let output = renderer.output_path(input);
    renderer.render(input, &output, progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OptimizerConfig;
    use crate::error::ErrorKind;
    use crate::pipeline::progress::ProgressReporter;
    use image::RgbImage;
    use tempfile::tempdir;

    fn quiet_config() -> Config {
        let mut config = Config::default();
        config.output.optimizer = OptimizerConfig {
            enabled: false,
            ..OptimizerConfig::default()
        };
        config
    }

    /// Frame `i`, LED `v` gets a color unique to that pair
    fn color(i: usize, v: usize) -> [u8; 3] {
        [(i % 256) as u8, (v % 256) as u8, ((i + v) % 200 + 50) as u8]
    }

    fn write_log(path: &Path, frames: usize, leds: usize) {
        let mut content = String::new();
        for i in 0..frames {
            let row: Vec<String> = (0..leds)
                .flat_map(|v| color(i, v))
                .map(|c| c.to_string())
                .collect();
            content.push_str(&row.join(","));
            content.push('\n');
        }
        std::fs::write(path, content).unwrap();
    }

    fn lit_count(image: &RgbImage) -> usize {
        image.pixels().filter(|p| p.0 != [0, 0, 0]).count()
    }

    #[test]
    fn test_output_path_strips_suffix() {
        let input = Path::new("logs/rainbow_2d.csv");
        assert_eq!(output_path_for(input, 7, "gif", None), PathBuf::from("logs/rainbow.gif"));
        assert_eq!(output_path_for(input, 4, "png", None), PathBuf::from("logs/rainbow_2d.png"));
        assert_eq!(
            output_path_for(input, 4, "png", Some(Path::new("out"))),
            PathBuf::from("out/rainbow_2d.png")
        );
        assert_eq!(output_path_for(Path::new("abc"), 7, "gif", None), PathBuf::from("abc.gif"));
    }

    #[test]
    fn test_paint_frame_touches_one_cell_per_led() {
        let table = LocationTable::new((0..12).map(|i| (i % 4, i / 4)).collect());
        let layout = PositionalLayout::new(Arc::new(table));
        let frame = Frame::new(0, (0..12).map(|v| Rgb(color(1, v))).collect());

        let mut canvas = AnimatedCanvas::new(4, 3, Vec::<RgbImage>::new());
        paint_frame(&mut canvas, &layout, &frame).unwrap();
        assert_eq!(lit_count(canvas.current()), 12 * 4);

        let plan = ChunkPlan::plan(1, 12, 10, None).unwrap();
        let mut strip = StaticCanvas::new(plan.width(), plan.height());
        paint_frame(&mut strip, &LinearLayout::new(plan), &frame).unwrap();
        assert_eq!(lit_count(strip.as_image()), 12);
    }

    #[test]
    fn test_png_matches_log_for_single_chunk() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("strip.csv");
        write_log(&input, 30, 6);

        let mut config = quiet_config();
        config.strip.num_leds = 6;
        let renderer = StripRenderer::new(&config);
        let progress = ProgressReporter::hidden().file("strip");

        let summary = render_one(&renderer, &input, &progress).unwrap();
        assert_eq!(summary.output, dir.path().join("strip.png"));
        assert_eq!(summary.dimensions, (6, 30));
        assert_eq!(progress.position(), 30);

        let image = image::open(&summary.output).unwrap().to_rgb8();
        assert_eq!(image.dimensions(), (6, 30));
        for i in 0..30 {
            for v in 0..6 {
                assert_eq!(image.get_pixel(v as u32, i as u32).0, color(i, v));
            }
        }
    }

    #[test]
    fn test_png_multi_column_gutters() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("long.csv");
        write_log(&input, 25, 4);

        let mut config = quiet_config();
        config.strip.num_leds = 4;
        config.strip.height = Some(10);
        let renderer = StripRenderer::new(&config);

        let summary = render_one(&renderer, &input, &ProgressReporter::hidden().file("long")).unwrap();
        assert_eq!(summary.columns, Some(3));

        let image = image::open(&summary.output).unwrap().to_rgb8();
        assert_eq!(image.dimensions(), (32, 10));

        // Frame 12 sits in chunk 1, row 2
        assert_eq!(image.get_pixel(14 + 3, 2).0, color(12, 3));
        // Gutter after chunks 0 and 1, on every row those chunks fill
        for y in 0..10 {
            for x in (4..14).chain(18..28) {
                assert_eq!(image.get_pixel(x, y).0, [32, 32, 32]);
            }
        }
        // Unused rows of the last chunk stay black
        assert_eq!(image.get_pixel(28, 7).0, [0, 0, 0]);
    }

    #[test]
    fn test_empty_log_fails() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("empty.csv");
        std::fs::write(&input, "").unwrap();

        let renderer = StripRenderer::new(&quiet_config());
        let err = render_one(&renderer, &input, &ProgressReporter::hidden().file("empty")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyInput);
        assert!(!dir.path().join("empty.png").exists());
    }

    #[test]
    fn test_gif_frames_follow_locations() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("matrix_2d.csv");
        write_log(&input, 3, 4);

        let mut config = quiet_config();
        config.animation.width = 2;
        config.animation.height = 2;
        let table = LocationTable::new(vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
        let renderer = AnimationRenderer::new(&config, Arc::new(table));

        let summary = render_one(&renderer, &input, &ProgressReporter::hidden().file("matrix")).unwrap();
        assert_eq!(summary.output, dir.path().join("matrix.gif"));
        assert_eq!(summary.frames, 3);
        assert_eq!(summary.dimensions, (4, 4));
        assert_eq!(summary.optimization, Some(Optimization::Disabled));

        let mut options = gif::DecodeOptions::new();
        options.set_color_output(gif::ColorOutput::RGBA);
        let file = std::fs::File::open(&summary.output).unwrap();
        let mut decoder = options.read_info(file).unwrap();

        let mut index = 0;
        while let Some(frame) = decoder.read_next_frame().unwrap() {
            assert_eq!(frame.delay, 2);
            // LED 3 sits at cell (1, 1) -> pixel (3, 3)
            let offset = (3 * 4 + 3) * 4;
            assert_eq!(&frame.buffer[offset..offset + 3], &color(index, 3));
            index += 1;
        }
        assert_eq!(index, 3);
    }

    #[test]
    fn test_short_location_table_fails_and_cleans_up() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("matrix_2d.csv");
        write_log(&input, 2, 4);

        let mut config = quiet_config();
        config.animation.width = 2;
        config.animation.height = 2;
        let table = LocationTable::new(vec![(0, 0), (1, 0)]);
        let renderer = AnimationRenderer::new(&config, Arc::new(table));

        let err = render_one(&renderer, &input, &ProgressReporter::hidden().file("matrix")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IndexOutOfRange);
        assert!(!dir.path().join("matrix.gif").exists());
    }
}
