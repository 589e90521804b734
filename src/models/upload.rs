/// 待上传到评分服务的文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub content: Vec<u8>,
    pub mime_type: Option<String>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_from_name(&file_name).map(str::to_string);
        Self {
            file_name,
            content: content.into(),
            mime_type,
        }
    }

    /// 纯文本文件可以直接在本地读取，不需要调用文本提取服务
    pub fn is_plain_text(&self) -> bool {
        self.mime_type.as_deref() == Some("text/plain")
    }

    /// 按 UTF-8 解码（非法字节替换为 U+FFFD）
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}

fn mime_from_name(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "txt" | "md" => Some("text/plain"),
        "pdf" => Some("application/pdf"),
        "docx" => Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        "doc" => Some("application/msword"),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_is_guessed_from_extension() {
        assert!(UploadFile::new("essay.TXT", "hi").is_plain_text());
        assert_eq!(
            UploadFile::new("rubric.pdf", Vec::new()).mime_type.as_deref(),
            Some("application/pdf")
        );
        assert_eq!(UploadFile::new("README", Vec::new()).mime_type, None);
    }

    #[test]
    fn lossy_text_decoding() {
        let file = UploadFile::new("a.txt", vec![b'h', b'i', 0xff]);
        assert_eq!(file.text_lossy(), "hi\u{fffd}");
    }
}
