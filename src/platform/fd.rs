//! File-descriptor terminal backed by libc.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use libc::c_int;

use crate::config::EnvConfig;
use crate::logging;
use crate::platform::terminal::{ReadByte, TerminalIo};

const DEFAULT_WIDTH: usize = 80;
const ATTR_RETRIES: u32 = 3;

fn get_termios(fd: c_int) -> io::Result<libc::termios> {
    let mut termios = unsafe { std::mem::zeroed::<libc::termios>() };
    let mut tries = ATTR_RETRIES;
    loop {
        let result = unsafe { libc::tcgetattr(fd, &mut termios) };
        if result == 0 {
            return Ok(termios);
        }
        let err = io::Error::last_os_error();
        tries -= 1;
        if err.kind() != io::ErrorKind::Interrupted || tries == 0 {
            return Err(err);
        }
    }
}

fn set_termios(fd: c_int, termios: &libc::termios) -> io::Result<()> {
    let mut tries = ATTR_RETRIES;
    loop {
        let result = unsafe { libc::tcsetattr(fd, libc::TCSADRAIN, termios) };
        if result == 0 {
            return Ok(());
        }
        let err = io::Error::last_os_error();
        tries -= 1;
        if err.kind() != io::ErrorKind::Interrupted || tries == 0 {
            return Err(err);
        }
    }
}

fn wait_readable(fd: c_int, timeout_seconds: u32) -> io::Result<bool> {
    loop {
        let mut read_fds = unsafe { std::mem::zeroed::<libc::fd_set>() };
        unsafe {
            libc::FD_ZERO(&mut read_fds);
            libc::FD_SET(fd, &mut read_fds);
        }
        let mut timeout = libc::timeval {
            tv_sec: timeout_seconds as libc::time_t,
            tv_usec: 0,
        };
        let result = unsafe {
            libc::select(
                fd + 1,
                &mut read_fds,
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                &mut timeout,
            )
        };
        if result < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(err);
        }
        return Ok(result > 0);
    }
}

fn read_one(fd: c_int) -> io::Result<Option<u8>> {
    let mut byte = 0u8;
    loop {
        let result = unsafe { libc::read(fd, &mut byte as *mut u8 as *mut libc::c_void, 1) };
        if result < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(err);
        }
        if result == 0 {
            return Ok(None);
        }
        return Ok(Some(byte));
    }
}

fn write_all_fd(fd: c_int, bytes: &[u8]) -> io::Result<()> {
    let mut written = 0;
    while written < bytes.len() {
        let remaining = &bytes[written..];
        let result = unsafe {
            libc::write(fd, remaining.as_ptr() as *const libc::c_void, remaining.len())
        };
        if result < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(err);
        }
        if result == 0 {
            return Err(io::Error::new(io::ErrorKind::WriteZero, "write returned 0"));
        }
        written += result as usize;
    }
    Ok(())
}

fn read_winsize(fd: c_int) -> Option<usize> {
    let mut size = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut size) };
    if result == 0 && size.ws_col > 0 && size.ws_row > 0 {
        Some(size.ws_col as usize)
    } else {
        None
    }
}

/// Terminal over a pair of raw file descriptors.
pub struct FdTerminal {
    in_fd: c_int,
    out_fd: c_int,
    saved_termios: Option<libc::termios>,
    write_log_path: Option<PathBuf>,
    write_log_failed: bool,
}

impl FdTerminal {
    /// Terminal on stdin/stdout.
    pub fn stdio() -> Self {
        Self::from_fds(libc::STDIN_FILENO, libc::STDOUT_FILENO)
    }

    pub fn from_fds(in_fd: c_int, out_fd: c_int) -> Self {
        let config = EnvConfig::from_env();
        Self {
            in_fd,
            out_fd,
            saved_termios: None,
            write_log_path: config.write_log.map(PathBuf::from),
            write_log_failed: false,
        }
    }

    fn log_write(&mut self, data: &[u8]) {
        let Some(path) = self.write_log_path.as_ref() else {
            return;
        };
        if self.write_log_failed {
            return;
        }
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| file.write_all(data));
        if result.is_err() {
            self.write_log_failed = true;
        }
    }
}

impl TerminalIo for FdTerminal {
    fn read_byte(&mut self, timeout_seconds: u32) -> ReadByte {
        if timeout_seconds > 0 {
            match wait_readable(self.in_fd, timeout_seconds) {
                Ok(true) => {}
                Ok(false) => return ReadByte::TimedOut,
                Err(err) => {
                    logging::debug_log(&format!("select on fd {} failed: {err}", self.in_fd));
                    return ReadByte::Eof;
                }
            }
        }
        match read_one(self.in_fd) {
            Ok(Some(byte)) => ReadByte::Byte(byte),
            Ok(None) => ReadByte::Eof,
            Err(err) => {
                logging::debug_log(&format!("read on fd {} failed: {err}", self.in_fd));
                ReadByte::Eof
            }
        }
    }

    fn write(&mut self, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        if let Err(err) = write_all_fd(self.out_fd, data) {
            logging::debug_log(&format!("write on fd {} failed: {err}", self.out_fd));
            return;
        }
        self.log_write(data);
    }

    fn width(&self) -> usize {
        read_winsize(self.out_fd).unwrap_or(DEFAULT_WIDTH)
    }

    fn is_interactive(&self) -> bool {
        unsafe { libc::isatty(self.in_fd) == 1 }
    }

    fn enter_raw_mode(&mut self) -> io::Result<()> {
        let saved = get_termios(self.in_fd)?;
        let mut raw = saved;
        // No echo, canonical mode off, no signal generation; keep parity bits
        // and the top bit intact. One-byte reads, no driver timeout.
        raw.c_lflag &= !(libc::ECHO | libc::ICANON | libc::ISIG);
        raw.c_iflag &= !(libc::INPCK | libc::ISTRIP);
        raw.c_cc[libc::VMIN] = 1;
        raw.c_cc[libc::VTIME] = 0;
        set_termios(self.in_fd, &raw)?;
        self.saved_termios = Some(saved);
        Ok(())
    }

    fn restore_mode(&mut self) -> io::Result<()> {
        if let Some(saved) = self.saved_termios.take() {
            set_termios(self.in_fd, &saved)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{write_all_fd, FdTerminal};
    use crate::platform::terminal::TerminalIo;
    use std::io::Read;

    #[test]
    fn write_goes_to_the_out_fd() {
        let mut fds = [0i32; 2];
        let result = unsafe { libc::pipe(fds.as_mut_ptr()) };
        assert_eq!(result, 0);
        let [read_fd, write_fd] = fds;

        let mut term = FdTerminal::from_fds(read_fd, write_fd);
        term.write(b"hello");

        let mut file = unsafe { <std::fs::File as std::os::unix::io::FromRawFd>::from_raw_fd(read_fd) };
        unsafe { libc::close(write_fd) };
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer).expect("pipe read failed");
        assert_eq!(buffer, b"hello");
    }

    #[test]
    fn pipe_input_is_not_interactive() {
        let mut fds = [0i32; 2];
        let result = unsafe { libc::pipe(fds.as_mut_ptr()) };
        assert_eq!(result, 0);
        let term = FdTerminal::from_fds(fds[0], fds[1]);
        assert!(!term.is_interactive());
        unsafe {
            libc::close(fds[0]);
            libc::close(fds[1]);
        }
    }

    #[test]
    fn write_all_handles_multiple_chunks() {
        let mut fds = [0i32; 2];
        let result = unsafe { libc::pipe(fds.as_mut_ptr()) };
        assert_eq!(result, 0);
        write_all_fd(fds[1], b"chunked write").expect("write failed");
        unsafe { libc::close(fds[1]) };
        let mut file = unsafe { <std::fs::File as std::os::unix::io::FromRawFd>::from_raw_fd(fds[0]) };
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer).expect("pipe read failed");
        assert_eq!(buffer, b"chunked write");
    }
}
