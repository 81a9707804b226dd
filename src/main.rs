use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use fblock_archive::{ArchiveCli, ArchiveError, ArchiveSystem};

fn main() -> Result<(), ArchiveError> {
    let config = ArchiveCli::init()?;
    log::info!("{:#?}", config);

    let archive = ArchiveSystem::new(config)?;
    archive.drive()?;

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl-C handler");

    archive.wait(&running);
    archive.shutdown()?;

    Ok(())
}
