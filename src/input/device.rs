//! Line reader for the button device.
//!
//! The device prints one channel number per line. A background thread reads
//! lines and forwards parsed signals over a channel; the game loop drains
//! that channel between ticks. Port setup (baud rate, handshake) happens
//! outside this crate; anything that implements `Read` works, including a
//! serial tty opened as a file.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, info, warn};

use super::{parse_line, DeviceSignal};

/// Open a device path for reading.
pub fn open(path: &Path) -> io::Result<File> {
    File::open(path)
}

/// Spawn a reader over `source`. The thread ends at EOF, on a read error,
/// or once the receiver is dropped.
pub fn spawn_reader<R>(source: R) -> io::Result<(Receiver<DeviceSignal>, JoinHandle<()>)>
where
    R: Read + Send + 'static,
{
    let (tx, rx) = unbounded();
    let handle = thread::Builder::new()
        .name("device-reader".into())
        .spawn(move || read_lines(source, tx))?;
    Ok((rx, handle))
}

/// Read `source` line by line, forwarding each parsed signal to `tx`.
pub fn read_lines<R: Read>(source: R, tx: Sender<DeviceSignal>) {
    let reader = BufReader::new(source);
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                warn!(%err, "device read failed, reader stopping");
                return;
            }
        };

        match parse_line(&line) {
            Some(signal) => {
                if tx.send(signal).is_err() {
                    debug!("device receiver dropped, reader stopping");
                    return;
                }
            }
            None => debug!(line = %line.trim(), "unparseable device line dropped"),
        }
    }
    info!("device stream ended");
}
