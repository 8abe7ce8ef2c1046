//! Native Messaging 消息分帧
//!
//! Chrome/Firefox 的 Native Messaging 协议：每条消息前 4 字节为
//! 本机字节序的长度，后跟对应长度的 UTF-8 JSON 内容。
//! 两个方向使用同一种帧格式。

use std::io::{self, Read, Write};

/// 读取一条完整消息
///
/// 流在消息边界处正常结束时返回 None；长度头或内容读到一半
/// 流就断开则是错误。
pub fn read_message<R: Read>(reader: &mut R) -> io::Result<Option<Vec<u8>>> {
    let mut len_buf = [0u8; 4];
    if let Err(e) = reader.read_exact(&mut len_buf) {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            return Ok(None);
        }
        return Err(e);
    }

    let len = u32::from_ne_bytes(len_buf) as usize;
    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload)?;

    Ok(Some(payload))
}

/// 写出一条消息并刷新
pub fn write_message<W: Write>(writer: &mut W, payload: &[u8]) -> io::Result<()> {
    let len = u32::try_from(payload.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "message too large"))?;

    writer.write_all(&len.to_ne_bytes())?;
    writer.write_all(payload)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_roundtrip() {
        let mut buf = Vec::new();
        write_message(&mut buf, br#"{"name":"version"}"#).unwrap();

        let mut cursor = Cursor::new(buf);
        let message = read_message(&mut cursor).unwrap().unwrap();
        assert_eq!(message, br#"{"name":"version"}"#);

        // 流结束
        assert_eq!(read_message(&mut cursor).unwrap(), None);
    }

    #[test]
    fn test_empty_payload() {
        let mut buf = Vec::new();
        write_message(&mut buf, b"").unwrap();

        let mut cursor = Cursor::new(buf);
        assert_eq!(read_message(&mut cursor).unwrap(), Some(Vec::new()));
    }

    #[test]
    fn test_eof_at_boundary_is_none() {
        let mut cursor = Cursor::new(Vec::<u8>::new());
        assert_eq!(read_message(&mut cursor).unwrap(), None);
    }

    #[test]
    fn test_truncated_length_is_error() {
        let mut cursor = Cursor::new(vec![0x05, 0x00]);
        assert!(read_message(&mut cursor).is_err());
    }

    #[test]
    fn test_truncated_payload_is_error() {
        let mut buf = 10u32.to_ne_bytes().to_vec();
        buf.extend_from_slice(b"abc");

        let mut cursor = Cursor::new(buf);
        assert!(read_message(&mut cursor).is_err());
    }

    #[test]
    fn test_consecutive_messages() {
        let mut buf = Vec::new();
        write_message(&mut buf, b"first").unwrap();
        write_message(&mut buf, b"second").unwrap();

        let mut cursor = Cursor::new(buf);
        assert_eq!(read_message(&mut cursor).unwrap().unwrap(), b"first");
        assert_eq!(read_message(&mut cursor).unwrap().unwrap(), b"second");
        assert_eq!(read_message(&mut cursor).unwrap(), None);
    }
}
