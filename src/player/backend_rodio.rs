use crate::player::{EngineError, EngineEvent, MediaEngine, MediaHandle};
use anyhow::Result;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};
use rodio::{ChannelCount, Decoder, OutputStream, OutputStreamBuilder, SampleRate, Sink, Source};
use std::{
    collections::HashMap,
    fs::File,
    io::{self, BufReader, Read, Seek, SeekFrom},
    path::{Path, PathBuf},
    thread,
    time::Duration,
};
use tracing::{debug, warn};
use ureq::Agent;

// A radio body that delivers nothing for this long is treated as dead
const STALL_TIMEOUT: Duration = Duration::from_secs(2);
const CHUNK_SIZE: usize = 16 * 1024;
const CHUNK_BACKLOG: usize = 64;

struct Loaded {
    sink: Sink,
    duration: Option<Duration>,
}

/// Local files decoded by rodio, radio streams pulled over HTTP with ureq.
/// Each acquired resource gets its own sink on the shared output stream.
pub struct RodioEngine {
    stream: OutputStream,
    agent: Agent,
    media_dir: PathBuf,
    notices: Sender<EngineEvent>,

    loaded: HashMap<MediaHandle, Loaded>,
    next_id: u64,
}

impl RodioEngine {
    pub fn new(
        media_dir: PathBuf,
        connect_timeout: Duration,
        notices: Sender<EngineEvent>,
    ) -> Result<Self> {
        let mut stream = OutputStreamBuilder::open_default_stream()?;
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            agent: stream_agent(connect_timeout),
            media_dir,
            notices,
            loaded: HashMap::new(),
            next_id: 0,
        })
    }

    fn next_handle(&mut self) -> MediaHandle {
        self.next_id += 1;
        MediaHandle(self.next_id)
    }

    fn attach<S>(&mut self, handle: MediaHandle, source: S, duration: Option<Duration>) -> MediaHandle
    where
        S: Source<Item = f32> + Send + 'static,
    {
        let sink = Sink::connect_new(self.stream.mixer());
        sink.pause();
        sink.append(source);

        self.loaded.insert(handle, Loaded { sink, duration });
        handle
    }
}

impl MediaEngine for RodioEngine {
    fn acquire_local(&mut self, resource: &str) -> Result<MediaHandle, EngineError> {
        let path = resolve(&self.media_dir, resource);
        if !path.is_file() {
            return Err(EngineError::NotFound(path.display().to_string()));
        }

        let source =
            decode(&path).map_err(|e| EngineError::Decode(format!("{}: {e}", path.display())))?;
        let duration = source.total_duration();

        let handle = self.next_handle();
        let source = FinishSignal::new(source, handle, self.notices.clone());
        debug!(path = %path.display(), %handle, "local resource acquired");

        Ok(self.attach(handle, source, duration))
    }

    fn acquire_stream(&mut self, url: &str) -> Result<MediaHandle, EngineError> {
        let (live, hint) = open_stream(&self.agent, url)?;

        let source = Decoder::builder()
            .with_data(live)
            .with_seekable(false)
            .with_hint(hint)
            .build()
            .map_err(|e| EngineError::Decode(format!("{url}: {e}")))?;

        let handle = self.next_handle();
        debug!(url, %handle, "stream resource acquired");

        Ok(self.attach(handle, source, None))
    }

    fn play(&mut self, handle: MediaHandle) {
        if let Some(l) = self.loaded.get(&handle) {
            l.sink.play();
        }
    }

    fn pause(&mut self, handle: MediaHandle) {
        if let Some(l) = self.loaded.get(&handle) {
            l.sink.pause();
        }
    }

    fn stop(&mut self, handle: MediaHandle) {
        if let Some(l) = self.loaded.remove(&handle) {
            l.sink.stop();
        }
    }

    fn seek(&mut self, handle: MediaHandle, position: Duration) -> Result<(), EngineError> {
        let loaded = self
            .loaded
            .get(&handle)
            .ok_or_else(|| EngineError::Seek(format!("{handle} is not loaded")))?;

        loaded
            .sink
            .try_seek(position)
            .map_err(|e| EngineError::Seek(e.to_string()))
    }

    fn set_volume(&mut self, handle: MediaHandle, level: f32) {
        if let Some(l) = self.loaded.get(&handle) {
            l.sink.set_volume(level);
        }
    }

    fn position(&self, handle: MediaHandle) -> Duration {
        self.loaded
            .get(&handle)
            .map(|l| l.sink.get_pos())
            .unwrap_or_default()
    }

    fn duration(&self, handle: MediaHandle) -> Option<Duration> {
        self.loaded.get(&handle).and_then(|l| l.duration)
    }
}

/// Connect, send and header phases are bounded. The body is not, since a
/// live stream never ends.
fn stream_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_connect(Some(timeout))
        .timeout_send_request(Some(timeout))
        .timeout_recv_response(Some(timeout))
        .build()
        .into()
}

fn open_stream(agent: &Agent, url: &str) -> Result<(LiveStream, &'static str), EngineError> {
    let response = agent
        .get(url)
        .call()
        .map_err(|e| EngineError::Connection(e.to_string()))?;

    let hint = stream_hint(
        response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
    );
    let body = response.into_body().into_reader();

    let live = LiveStream::spawn(body, STALL_TIMEOUT)
        .map_err(|e| EngineError::Connection(e.to_string()))?;

    Ok((live, hint))
}

/// `<media_dir>/<resource>`, with `.mp3` appended unless the id already ends
/// in a known audio extension
fn resolve(media_dir: &Path, resource: &str) -> PathBuf {
    let path = media_dir.join(resource);
    let known = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(format_hint)
        .is_some();

    match known {
        true => path,
        false => {
            let mut name = path.into_os_string();
            name.push(".mp3");
            PathBuf::from(name)
        }
    }
}

fn format_hint(ext: &str) -> Option<&'static str> {
    let hint = match ext.to_ascii_lowercase().as_str() {
        "adif" | "adts" | "aac" => "aac",
        "m4a" | "m4b" | "m4p" | "m4r" | "mp4" => "audio/mp4",
        "bit" | "mpga" | "mp3" => "mp3",
        "oga" | "ogx" | "spx" | "ogg" => "audio/ogg",
        "wave" | "wav" => "wav",
        "flac" => "flac",
        _ => return None,
    };
    Some(hint)
}

fn decode(song: &Path) -> Result<Decoder<BufReader<File>>> {
    let file = File::open(song)?;
    let len = file.metadata()?.len();

    let mut builder = Decoder::builder()
        .with_data(BufReader::new(file))
        .with_byte_len(len)
        .with_seekable(true);

    if let Some(hint) = song.extension().and_then(|e| e.to_str()).and_then(format_hint) {
        builder = builder.with_hint(hint);
    }

    Ok(builder.build()?)
}

fn stream_hint(content_type: Option<&str>) -> &'static str {
    match content_type {
        Some(ct) if ct.starts_with("audio/aac") => "aac",
        Some(ct) if ct.starts_with("audio/ogg") => "ogg",
        _ => "mp3",
    }
}

/// Forward-only reader over an HTTP body.
///
/// The socket is drained on a fetch thread into a bounded channel, so the
/// audio callback never waits on the network for longer than the stall
/// timeout. Only the current position can be queried; any real seek fails,
/// which is fine because the decoder is told the data is unseekable.
struct LiveStream {
    chunks: Receiver<io::Result<Vec<u8>>>,
    pending: Vec<u8>,
    offset: usize,
    stall_timeout: Duration,
    read: u64,
}

impl LiveStream {
    fn spawn<R>(mut body: R, stall_timeout: Duration) -> io::Result<Self>
    where
        R: Read + Send + 'static,
    {
        let (tx, rx) = bounded(CHUNK_BACKLOG);

        thread::Builder::new()
            .name("radio-fetch".to_string())
            .spawn(move || {
                let mut buf = vec![0u8; CHUNK_SIZE];
                loop {
                    let chunk = match body.read(&mut buf) {
                        Ok(0) => break,
                        Ok(n) => Ok(buf[..n].to_vec()),
                        Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                        Err(e) => Err(e),
                    };
                    let failed = chunk.is_err();

                    // Receiver gone means the sink was stopped
                    if tx.send(chunk).is_err() || failed {
                        break;
                    }
                }
            })?;

        Ok(LiveStream {
            chunks: rx,
            pending: Vec::new(),
            offset: 0,
            stall_timeout,
            read: 0,
        })
    }
}

impl Read for LiveStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.offset >= self.pending.len() {
            match self.chunks.recv_timeout(self.stall_timeout) {
                Ok(chunk) => {
                    self.pending = chunk?;
                    self.offset = 0;
                }
                Err(RecvTimeoutError::Disconnected) => return Ok(0),
                Err(RecvTimeoutError::Timeout) => {
                    warn!("radio stream stalled, ending it");
                    return Err(io::Error::new(
                        io::ErrorKind::TimedOut,
                        "radio stream stalled",
                    ));
                }
            }
        }

        let available = &self.pending[self.offset..];
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);

        self.offset += n;
        self.read += n as u64;
        Ok(n)
    }
}

impl Seek for LiveStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match pos {
            SeekFrom::Current(0) => Ok(self.read),
            _ => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "live streams cannot seek",
            )),
        }
    }
}

/// Passes samples through and posts `Finished` once the input runs dry
struct FinishSignal<I> {
    input: I,
    handle: MediaHandle,
    notices: Sender<EngineEvent>,
    sent: bool,
}

impl<I> FinishSignal<I> {
    fn new(input: I, handle: MediaHandle, notices: Sender<EngineEvent>) -> Self {
        FinishSignal {
            input,
            handle,
            notices,
            sent: false,
        }
    }
}

impl<I> Iterator for FinishSignal<I>
where
    I: Source<Item = f32>,
{
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        match self.input.next() {
            Some(sample) => Some(sample),
            None => {
                if !self.sent {
                    self.sent = true;
                    let _ = self.notices.send(EngineEvent::Finished(self.handle));
                }
                None
            }
        }
    }
}

impl<I> Source for FinishSignal<I>
where
    I: Source<Item = f32>,
{
    fn channels(&self) -> ChannelCount {
        self.input.channels()
    }

    fn sample_rate(&self) -> SampleRate {
        self.input.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.input.total_duration()
    }

    fn current_span_len(&self) -> Option<usize> {
        self.input.current_span_len()
    }

    fn try_seek(&mut self, pos: Duration) -> Result<(), rodio::source::SeekError> {
        self.input.try_seek(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use std::{io::Cursor, net::TcpListener, time::Instant};

    const WAIT: Duration = Duration::from_secs(3);

    #[test]
    fn stream_hint_follows_content_type() {
        assert_eq!(stream_hint(Some("audio/aacp")), "aac");
        assert_eq!(stream_hint(Some("audio/ogg; codecs=vorbis")), "ogg");
        assert_eq!(stream_hint(Some("audio/mpeg")), "mp3");
        assert_eq!(stream_hint(None), "mp3");
    }

    #[test]
    fn live_stream_reads_forward_only() {
        let mut stream = LiveStream::spawn(Cursor::new(vec![1u8, 2, 3, 4]), WAIT).unwrap();
        let mut buf = [0u8; 3];

        assert_eq!(stream.read(&mut buf).unwrap(), 3);
        assert_eq!(buf, [1, 2, 3]);
        assert_eq!(stream.stream_position().unwrap(), 3);
        assert!(stream.seek(SeekFrom::Start(0)).is_err());
        assert!(stream.seek(SeekFrom::End(0)).is_err());

        assert_eq!(stream.read(&mut buf).unwrap(), 1);
        assert_eq!(stream.read(&mut buf).unwrap(), 0);
    }

    /// Blocks every read until the test drops its sender
    struct SilentBody(crossbeam_channel::Receiver<()>);

    impl Read for SilentBody {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            let _ = self.0.recv();
            Ok(0)
        }
    }

    #[test]
    fn stalled_stream_ends_with_timeout() {
        let (hold, release) = unbounded::<()>();
        let mut stream =
            LiveStream::spawn(SilentBody(release), Duration::from_millis(50)).unwrap();

        let started = Instant::now();
        let err = stream.read(&mut [0u8; 16]).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
        assert!(started.elapsed() < WAIT);
        drop(hold);
    }

    #[test]
    fn silent_station_is_a_connection_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        // Accept, then never answer
        thread::spawn(move || {
            let _held: Vec<_> = listener.incoming().take(1).collect();
            thread::sleep(Duration::from_secs(10));
        });

        let agent = stream_agent(Duration::from_millis(300));
        let started = Instant::now();
        let result = open_stream(&agent, &format!("http://{addr}/live"));

        assert!(matches!(result, Err(EngineError::Connection(_))));
        assert!(started.elapsed() < WAIT);
    }

    #[test]
    fn resolve_appends_mp3_to_bare_ids() {
        let dir = Path::new("/srv/media");

        assert_eq!(resolve(dir, "10 Helvetica"), dir.join("10 Helvetica.mp3"));
        assert_eq!(resolve(dir, "02 Mr. Brightside"), dir.join("02 Mr. Brightside.mp3"));
        assert_eq!(resolve(dir, "v1.2"), dir.join("v1.2.mp3"));
    }

    #[test]
    fn resolve_keeps_audio_extensions() {
        let dir = Path::new("/srv/media");

        assert_eq!(resolve(dir, "song.flac"), dir.join("song.flac"));
        assert_eq!(resolve(dir, "Loud.MP3"), dir.join("Loud.MP3"));
        assert_eq!(resolve(dir, "album/side.m4a"), dir.join("album/side.m4a"));
    }

    #[test]
    fn format_hint_maps_aliases() {
        assert_eq!(format_hint("adts"), Some("aac"));
        assert_eq!(format_hint("M4B"), Some("audio/mp4"));
        assert_eq!(format_hint("wave"), Some("wav"));
        assert_eq!(format_hint("Brightside"), None);
    }

    #[test]
    fn finish_signal_fires_once() {
        let (tx, rx) = unbounded();
        let samples = rodio::buffer::SamplesBuffer::new(1, 44_100, vec![0.1f32, 0.2]);
        let mut source = FinishSignal::new(samples, MediaHandle(7), tx);

        assert_eq!(source.next(), Some(0.1));
        assert!(rx.try_recv().is_err());
        assert_eq!(source.next(), Some(0.2));
        assert_eq!(source.next(), None);
        assert_eq!(source.next(), None);

        assert_eq!(rx.try_iter().collect::<Vec<_>>(), [EngineEvent::Finished(MediaHandle(7))]);
    }
}
