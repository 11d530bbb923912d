use crate::context::AppContext;
use crate::output::Output;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use std::fs;

pub fn run_clear(
    ctx: &AppContext,
    all: bool,
    recent: bool,
    session: bool,
    watchlist: bool,
    output: &Output,
) -> Result<()> {
    if !(all || recent || session || watchlist) {
        output.warn("No clear option specified. Use --recent, --session, --watchlist, or --all");
        output.info("\nExample: reelkeep clear --recent");
        return Ok(());
    }

    if all || recent {
        ctx.recent().clear().wrap_err("Failed to clear recent searches")?;
        output.success("Cleared recent searches");
    }

    if all {
        let sessions_dir = ctx.paths.sessions_dir();
        if sessions_dir.exists() {
            fs::remove_dir_all(&sessions_dir)
                .wrap_err_with(|| format!("Failed to remove {}", sessions_dir.display()))?;
            output.success(format!("Cleared all session state: {}", sessions_dir.display()));
        } else {
            output.info("No session state found to clear");
        }
    } else if session {
        ctx.session().clear().wrap_err("Failed to clear session state")?;
        output.success(format!("Cleared search state for session {}", ctx.session_id));
    }

    if all || watchlist {
        ctx.watchlist().clear().wrap_err("Failed to clear watchlist")?;
        output.success("Cleared watchlist");
    }

    Ok(())
}
