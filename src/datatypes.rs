use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read, Write};

// 基础整数类型读取函数
pub fn read_u8(cursor: &mut Cursor<&[u8]>) -> Result<u8, std::io::Error> {
    cursor.read_u8()
}

pub fn read_u16(cursor: &mut Cursor<&[u8]>) -> Result<u16, std::io::Error> {
    cursor.read_u16::<LittleEndian>()
}

pub fn read_u32(cursor: &mut Cursor<&[u8]>) -> Result<u32, std::io::Error> {
    cursor.read_u32::<LittleEndian>()
}

pub fn read_u64(cursor: &mut Cursor<&[u8]>) -> Result<u64, std::io::Error> {
    cursor.read_u64::<LittleEndian>()
}

pub fn read_i16(cursor: &mut Cursor<&[u8]>) -> Result<i16, std::io::Error> {
    cursor.read_i16::<LittleEndian>()
}

pub fn read_f32(cursor: &mut Cursor<&[u8]>) -> Result<f32, std::io::Error> {
    cursor.read_f32::<LittleEndian>()
}

// 基础整数类型写入函数
pub fn write_u8(writer: &mut dyn Write, value: u8) -> Result<(), std::io::Error> {
    writer.write_u8(value)
}

pub fn write_u16(writer: &mut dyn Write, value: u16) -> Result<(), std::io::Error> {
    writer.write_u16::<LittleEndian>(value)
}

pub fn write_u32(writer: &mut dyn Write, value: u32) -> Result<(), std::io::Error> {
    writer.write_u32::<LittleEndian>(value)
}

pub fn write_u64(writer: &mut dyn Write, value: u64) -> Result<(), std::io::Error> {
    writer.write_u64::<LittleEndian>(value)
}

pub fn write_i16(writer: &mut dyn Write, value: i16) -> Result<(), std::io::Error> {
    writer.write_i16::<LittleEndian>(value)
}

pub fn write_f32(writer: &mut dyn Write, value: f32) -> Result<(), std::io::Error> {
    writer.write_f32::<LittleEndian>(value)
}

/// 读取布尔值
///
/// 只接受 0 和 1，其余取值视为数据损坏，保证重新写出的字节与输入一致。
pub fn read_bool(cursor: &mut Cursor<&[u8]>) -> Result<bool, std::io::Error> {
    match cursor.read_u8()? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("无效的布尔值: 0x{:02X}", other),
        )),
    }
}

pub fn write_bool(writer: &mut dyn Write, value: bool) -> Result<(), std::io::Error> {
    writer.write_u8(value as u8)
}

/// 读取长度前缀字符串（u16 长度 + UTF-8 字节）
pub fn read_string(cursor: &mut Cursor<&[u8]>) -> Result<String, std::io::Error> {
    let length = read_u16(cursor)? as usize;
    let mut buffer = vec![0u8; length];
    cursor.read_exact(&mut buffer)?;

    String::from_utf8(buffer)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

pub fn write_string(writer: &mut dyn Write, value: &str) -> Result<(), std::io::Error> {
    let length = u16::try_from(value.len()).map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("字符串过长: {} bytes", value.len()),
        )
    })?;
    write_u16(writer, length)?;
    writer.write_all(value.as_bytes())
}

/// 读取元素数量前缀（u32），并按剩余字节数做合理性检查
pub fn read_count(cursor: &mut Cursor<&[u8]>, min_element_size: usize) -> Result<usize, std::io::Error> {
    let count = read_u32(cursor)? as usize;
    let remaining = cursor.get_ref().len().saturating_sub(cursor.position() as usize);

    if count.saturating_mul(min_element_size.max(1)) > remaining {
        return Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!("元素数量异常: {} (剩余 {} bytes)", count, remaining),
        ));
    }

    Ok(count)
}

pub fn write_count(writer: &mut dyn Write, count: usize) -> Result<(), std::io::Error> {
    let count = u32::try_from(count).map_err(|_| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "元素数量超出 u32 范围")
    })?;
    write_u32(writer, count)
}

// 个体数据标志位定义
bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PersonalFlags: u8 {
        const PRESENT_IN_GAME = 0x01;   // 游戏内可获得
        const BATTLE_ONLY = 0x02;       // 仅战斗中出现的形态
    }
}

// 压缩条目标志位定义
bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EntryFlags: u32 {
        const COMPRESSED = 0x00000001;  // zlib 压缩
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_bool_rejects_other_values() {
        let data = [0u8, 1, 2];
        let mut cursor = Cursor::new(&data[..]);

        assert!(!read_bool(&mut cursor).unwrap());
        assert!(read_bool(&mut cursor).unwrap());
        assert!(read_bool(&mut cursor).is_err());
    }

    #[test]
    fn test_string_layout() {
        let mut out = Vec::new();
        write_string(&mut out, "ev_0010").unwrap();
        assert_eq!(&out[..2], &[7, 0]);

        let mut cursor = Cursor::new(&out[..]);
        assert_eq!(read_string(&mut cursor).unwrap(), "ev_0010");
    }

    #[test]
    fn test_read_count_guards_remaining_bytes() {
        let data = [0xFFu8, 0xFF, 0x00, 0x00, 1, 2];
        let mut cursor = Cursor::new(&data[..]);
        assert!(read_count(&mut cursor, 1).is_err());
    }
}
