//! Shared fakes and scripted data for dispatcher tests

use async_trait::async_trait;
use mosql_catalog::MockDatabase;
use mosql_core::RowSet;
use mosql_engine::{Dispatcher, Synthesizer};
use mosql_plot::{PlotError, PlotPipeline, PlotRenderer, RasterImage, Rasterizer, TerminalGraphics};
use mosql_prompt::ScriptedModel;
use std::io::{self, Write};
use std::path::Path;

pub const REVENUE_SQL: &str = "SELECT n.n_name, SUM(l.l_extendedprice) AS revenue FROM nation n JOIN lineitem l ON l.l_nationkey = n.n_nationkey GROUP BY n.n_name;";

/// Writes a tiny SVG next to the script
pub struct FakeRenderer;

#[async_trait]
impl PlotRenderer for FakeRenderer {
    fn name(&self) -> &str {
        "fake"
    }

    async fn render(&self, script_path: &Path) -> Result<(), PlotError> {
        std::fs::write(script_path.with_file_name("plot.svg"), "<svg/>")?;
        Ok(())
    }
}

pub struct FakeRasterizer;

impl Rasterizer for FakeRasterizer {
    fn rasterize(&self, _svg: &[u8]) -> Result<RasterImage, PlotError> {
        Ok(RasterImage { width: 4, height: 3, png: b"PNG".to_vec() })
    }
}

pub struct FakeGraphics;

impl TerminalGraphics for FakeGraphics {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn available(&self) -> bool {
        true
    }

    fn encode(&self, out: &mut dyn Write, image: &RasterImage) -> io::Result<()> {
        out.write_all(&image.png)
    }
}

/// TPC-H slice with the revenue query scripted
pub async fn tpch_database() -> MockDatabase {
    let db = MockDatabase::new();
    db.add_schema(
        "tpch",
        &[
            ("lineitem", "CREATE TABLE `lineitem` (`l_nationkey` int, `l_extendedprice` decimal(15,2))"),
            ("nation", "CREATE TABLE `nation` (`n_nationkey` int, `n_name` char(25))"),
        ],
    )
    .await;
    db.add_result(
        REVENUE_SQL,
        RowSet::from_strs(&["n_name", "revenue"], &[&["CHINA", "10.5"], &["FRANCE", "7"]]),
    )
    .await;
    db
}

/// Dispatcher over clones of `db` and `model`, plotting into `tmp`
pub fn dispatcher(db: &MockDatabase, model: &ScriptedModel, tmp: &Path) -> Dispatcher {
    let plots = PlotPipeline::new(
        Box::new(FakeRenderer),
        Box::new(FakeRasterizer),
        Box::new(FakeGraphics),
    )
    .with_tmp_dir(tmp);

    Dispatcher::new(
        Box::new(db.clone()),
        Synthesizer::new(Box::new(model.clone())),
        plots,
    )
}
