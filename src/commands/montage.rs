use benchplot::config::ChartConfig;
use benchplot::montage::stitch_horizontal;
use benchplot::path::format_path_for_display;
use benchplot::styling::success;

use crate::cli::MontageArgs;

pub(crate) fn handle_montage(args: &MontageArgs, config: &ChartConfig) -> anyhow::Result<()> {
    if stitch_horizontal(&args.images, &args.out, config.theme.background)? {
        success(format!("Wrote {}", format_path_for_display(&args.out)));
    }
    Ok(())
}
