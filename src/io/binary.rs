//! 二进制记录编解码
//!
//! 记录以小端序紧凑布局存储，数组使用 u32 数量前缀。

use std::io::{Cursor, Write};
use std::marker::PhantomData;

use super::traits::RecordSerializer;
use crate::datatypes::{read_count, write_count};
use crate::utils::EditorError;

/// 可二进制编解码的记录
pub trait BinaryRecord: Sized {
    /// 单个元素至少占用的字节数，用于数量前缀的合理性检查
    const MIN_SIZE: usize = 1;

    /// 从游标读取一个记录
    fn read_from(cursor: &mut Cursor<&[u8]>) -> Result<Self, EditorError>;

    /// 写出记录
    fn write_to(&self, writer: &mut dyn Write) -> Result<(), EditorError>;
}

/// 读取带数量前缀的记录数组
pub fn read_array<T: BinaryRecord>(cursor: &mut Cursor<&[u8]>) -> Result<Vec<T>, EditorError> {
    let count = read_count(cursor, T::MIN_SIZE)?;
    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        items.push(T::read_from(cursor)?);
    }
    Ok(items)
}

/// 写出带数量前缀的记录数组
pub fn write_array<T: BinaryRecord>(writer: &mut dyn Write, items: &[T]) -> Result<(), EditorError> {
    write_count(writer, items.len())?;
    for item in items {
        item.write_to(writer)?;
    }
    Ok(())
}

/// 基于 [`BinaryRecord`] 的序列化器
///
/// 反序列化要求恰好消耗全部输入，尾部多余字节视为数据损坏。
#[derive(Debug)]
pub struct BinarySerializer<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> BinarySerializer<T> {
    pub fn new() -> Self {
        Self { _marker: PhantomData }
    }
}

impl<T> Default for BinarySerializer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for BinarySerializer<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T: BinaryRecord> RecordSerializer<T> for BinarySerializer<T> {
    fn deserialize(&self, bytes: &[u8]) -> Result<T, EditorError> {
        let mut cursor = Cursor::new(bytes);
        let value = T::read_from(&mut cursor).map_err(|e| match e {
            EditorError::Deserialization(msg) => EditorError::Deserialization(msg),
            other => EditorError::Deserialization(other.to_string()),
        })?;

        let consumed = cursor.position() as usize;
        if consumed != bytes.len() {
            return Err(EditorError::Deserialization(format!(
                "记录末尾有 {} 字节多余数据",
                bytes.len() - consumed
            )));
        }

        Ok(value)
    }

    fn serialize(&self, value: &T) -> Result<Vec<u8>, EditorError> {
        let mut output = Vec::new();
        value.write_to(&mut output).map_err(|e| match e {
            EditorError::Serialization(msg) => EditorError::Serialization(msg),
            other => EditorError::Serialization(other.to_string()),
        })?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::{read_u16, write_u16};

    #[derive(Debug, PartialEq)]
    struct Pair(u16, u16);

    impl BinaryRecord for Pair {
        const MIN_SIZE: usize = 4;

        fn read_from(cursor: &mut Cursor<&[u8]>) -> Result<Self, EditorError> {
            Ok(Pair(read_u16(cursor)?, read_u16(cursor)?))
        }

        fn write_to(&self, writer: &mut dyn Write) -> Result<(), EditorError> {
            write_u16(writer, self.0)?;
            write_u16(writer, self.1)?;
            Ok(())
        }
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let serializer = BinarySerializer::<Pair>::new();
        let result = serializer.deserialize(&[1, 0, 2, 0, 9]);
        assert!(matches!(result, Err(EditorError::Deserialization(_))));
    }

    #[test]
    fn test_truncated_input_rejected() {
        let serializer = BinarySerializer::<Pair>::new();
        let result = serializer.deserialize(&[1, 0, 2]);
        assert!(matches!(result, Err(EditorError::Deserialization(_))));
    }

    #[test]
    fn test_serialize_layout() {
        let serializer = BinarySerializer::<Pair>::new();
        assert_eq!(serializer.serialize(&Pair(1, 0x0203)).unwrap(), vec![1, 0, 3, 2]);
        assert_eq!(serializer.deserialize(&[1, 0, 3, 2]).unwrap(), Pair(1, 0x0203));
    }

    #[test]
    fn test_array_count_guard() {
        let mut data = Vec::new();
        write_count(&mut data, 1000).unwrap();
        data.extend_from_slice(&[0, 0, 0, 0]);

        let mut cursor = Cursor::new(&data[..]);
        assert!(read_array::<Pair>(&mut cursor).is_err());
    }
}
