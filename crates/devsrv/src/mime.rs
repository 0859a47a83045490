//! Content-type lookup by file extension.

/// MIME type for plain text bodies.
pub const TEXT: &str = "text/plain";

/// MIME type for HTML bodies.
pub const HTML: &str = "text/html";

/// MIME type for JavaScript bodies.
pub const JAVASCRIPT: &str = "text/javascript";

/// Fallback MIME type for unrecognized extensions.
pub const BINARY: &str = "application/octet-stream";

/// Map a file extension (without the dot) to a MIME type.
///
/// Unrecognized extensions fall back to `application/octet-stream`.
pub fn from_extension(extension: &str) -> &'static str {
    match extension {
        // Text
        "txt" => TEXT,
        "htm" | "html" => HTML,
        "css" => "text/css",
        "js" | "mjs" => JAVASCRIPT,
        "ts" => TEXT,
        // Font
        "eot" => "application/vnd.ms-fontobject",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        // Image
        "svg" => "image/svg+xml",
        "ico" => "image/vnd.microsoft.icon",
        "gif" => "image/gif",
        "jpg" | "jpeg" | "jfif" | "pjpeg" | "pjp" => "image/jpeg",
        "png" => "image/png",
        "apng" => "image/apng",
        "webp" => "image/webp",
        "avif" => "image/avif",
        // Audio and video
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "mp3" => "audio/mpeg",
        "mp4" | "m4v" => "video/mp4",
        "m4a" => "audio/mp4",
        "ogg" => "application/ogg",
        "oga" => "audio/ogg",
        "ogv" => "video/ogg",
        "weba" => "audio/webm",
        "webm" => "video/webm",
        "av1" => "video/av1",
        // Application data formats
        "json" => "application/json",
        "map" => "application/json",
        "yml" | "yaml" => "application/yaml",
        "xml" => "application/xml",
        "wasm" => "application/wasm",
        _ => BINARY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_extensions() {
        assert_eq!(from_extension("html"), "text/html");
        assert_eq!(from_extension("htm"), "text/html");
        assert_eq!(from_extension("js"), "text/javascript");
        assert_eq!(from_extension("css"), "text/css");
        assert_eq!(from_extension("json"), "application/json");
        assert_eq!(from_extension("wasm"), "application/wasm");
    }

    #[test]
    fn test_unknown_extension_is_binary() {
        assert_eq!(from_extension("xyz"), BINARY);
        assert_eq!(from_extension(""), BINARY);
    }

    #[test]
    fn test_typescript_serves_as_text() {
        assert_eq!(from_extension("ts"), TEXT);
    }
}
