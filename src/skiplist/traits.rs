///#### 快照落盘所需的文本编解码能力
///- to_record: 转为单行文本，不得包含换行符；作为 key 时亦不得包含分隔符 `:`
///- from_record: 从文本还原，解析失败返回 None
pub trait Record: Sized {
    fn to_record(&self) -> String;
    fn from_record(s: &str) -> Option<Self>;
}

impl Record for String {
    fn to_record(&self) -> String {
        self.clone()
    }

    fn from_record(s: &str) -> Option<Self> {
        Some(s.to_owned())
    }
}

macro_rules! impl_record {
    ($($obj: ty),*) => {
        $(
            impl Record for $obj {
                fn to_record(&self) -> String {
                    self.to_string()
                }

                fn from_record(s: &str) -> Option<Self> {
                    s.parse().ok()
                }
            }
        )*
    };
}

impl_record!(u8, u16, u32, u64, u128, usize);
impl_record!(i8, i16, i32, i64, i128, isize);
impl_record!(char, bool);
