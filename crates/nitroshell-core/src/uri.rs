//! 文件 URI 解析
//!
//! 文件管理器以 URI 形式提供选中项 (`file:///home/u/a.txt`)，
//! 而本地 API 需要文件系统路径。仅支持 file:// 协议。

use log::debug;
use std::path::PathBuf;
use url::Url;

/// 将 file:// URI 转换为本地路径
///
/// 去除协议和主机部分并做百分号解码。
/// 非 file 协议或无法解析的 URI 返回 None。
pub fn uri_to_path(uri: &str) -> Option<PathBuf> {
    let url = match Url::parse(uri) {
        Ok(url) => url,
        Err(e) => {
            debug!("无法解析 URI {}: {}", uri, e);
            return None;
        }
    };

    if url.scheme() != "file" {
        debug!("跳过非 file 协议的 URI: {}", uri);
        return None;
    }

    url.to_file_path().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_path() {
        assert_eq!(
            uri_to_path("file:///home/u/a.txt"),
            Some(PathBuf::from("/home/u/a.txt"))
        );
    }

    #[test]
    fn test_percent_decoding() {
        assert_eq!(
            uri_to_path("file:///home/u/b%20c.txt"),
            Some(PathBuf::from("/home/u/b c.txt"))
        );
    }

    #[test]
    fn test_directory_uri() {
        assert_eq!(
            uri_to_path("file:///home/u/Pictures/"),
            Some(PathBuf::from("/home/u/Pictures/"))
        );
    }

    #[test]
    fn test_localhost_host_is_stripped() {
        assert_eq!(
            uri_to_path("file://localhost/home/u/a.txt"),
            Some(PathBuf::from("/home/u/a.txt"))
        );
    }

    #[test]
    fn test_non_file_scheme_is_none() {
        assert_eq!(uri_to_path("sftp://host/home/u/a.txt"), None);
        assert_eq!(uri_to_path("trash:///a.txt"), None);
    }

    #[test]
    fn test_unparsable_uri_is_none() {
        assert_eq!(uri_to_path("not a uri"), None);
        assert_eq!(uri_to_path(""), None);
    }

    #[test]
    fn test_non_ascii_path() {
        assert_eq!(
            uri_to_path("file:///home/u/%E6%96%87%E6%A1%A3.txt"),
            Some(PathBuf::from("/home/u/文档.txt"))
        );
    }
}
