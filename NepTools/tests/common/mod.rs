//! Synthetic ISM2 and ARC files for the integration tests

#![allow(dead_code)]

use std::marker::PhantomData;

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};

/// Strings of [`triangle_ism2`], by id.
pub const STRINGS: [&str; 5] = ["Root", "body", "skin", "texture", "body_c"];

/// Growable buffer in one byte order, with absolute-offset patching.
pub struct Writer<B: ByteOrder> {
    pub data: Vec<u8>,
    order: PhantomData<B>,
}

impl<B: ByteOrder> Writer<B> {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            order: PhantomData,
        }
    }

    pub fn pos(&self) -> u32 {
        u32::try_from(self.data.len()).unwrap()
    }

    pub fn u32(&mut self, value: u32) -> &mut Self {
        self.data.write_u32::<B>(value).unwrap();
        self
    }

    pub fn i32(&mut self, value: i32) -> &mut Self {
        self.data.write_i32::<B>(value).unwrap();
        self
    }

    pub fn u16(&mut self, value: u16) -> &mut Self {
        self.data.write_u16::<B>(value).unwrap();
        self
    }

    pub fn f32(&mut self, value: f32) -> &mut Self {
        self.data.write_f32::<B>(value).unwrap();
        self
    }

    pub fn f16(&mut self, value: f32) -> &mut Self {
        self.u16(half::f16::from_f32(value).to_bits())
    }

    pub fn bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.data.extend_from_slice(bytes);
        self
    }

    pub fn zeros(&mut self, count: usize) -> &mut Self {
        self.data.resize(self.data.len() + count, 0);
        self
    }

    pub fn pad_to(&mut self, to: u32) -> &mut Self {
        self.data.resize(to as usize, 0);
        self
    }

    pub fn patch_u32(&mut self, at: u32, value: u32) {
        let at = at as usize;
        B::write_u32(&mut self.data[at..at + 4], value);
    }
}

/// Section codes in directory order.
const SECTIONS: [u32; 4] = [0x21, 0x61, 0x03, 0x0B];

/// Directory slot of a section code.
pub fn directory_slot(code: u32) -> u32 {
    let index = SECTIONS.iter().position(|&c| c == code).unwrap();
    0x20 + u32::try_from(index).unwrap() * 8
}

/// A complete ISM2 file holding one triangle.
///
/// - strings: [`STRINGS`]
/// - one material `skin` with the diffuse texture `body_c`
/// - one bone `Root` translated by `(1, 2, 3)` and rotated 90 degrees about
///   Z, carrying the surface `body` which uses `skin`
/// - three vertices, the last one coloured `vertex_colour`, and the face
///   `[0, 1, 2]`
pub fn triangle_ism2<B: ByteOrder>(vertex_colour: [u8; 4]) -> Vec<u8> {
    let mut w = Writer::<B>::new();

    // header
    w.bytes(b"ISM2").bytes(&[2, 0, 0, 0]).zeros(8);
    w.u32(0).u32(u32::try_from(SECTIONS.len()).unwrap()).zeros(8);
    for code in SECTIONS {
        w.u32(code).u32(0);
    }

    // 0x21 strings
    let strings = w.pos();
    w.patch_u32(directory_slot(0x21) + 4, strings);
    w.u32(0x21).u32(0x0C).u32(u32::try_from(STRINGS.len()).unwrap());
    let table = w.pos();
    w.zeros(STRINGS.len() * 4);
    for (i, s) in STRINGS.iter().enumerate() {
        let at = w.pos();
        w.patch_u32(table + u32::try_from(i).unwrap() * 4, at);
        w.bytes(s.as_bytes()).bytes(&[0]);
    }
    w.pad_to(w.pos().next_multiple_of(4));

    // 0x61 materials
    let materials = w.pos();
    w.patch_u32(directory_slot(0x61) + 4, materials);
    w.u32(0x61).u32(0x10).u32(1).u32(materials + 0x10);
    let material = w.pos();
    w.u32(0x0D).u32(0x20).u32(1).u32(2).zeros(0x0C).u32(material + 0x20);
    let texture_list = w.pos();
    w.u32(0x6C).u32(0x0C).u32(1).u32(texture_list + 0x10);
    let binding = w.pos();
    w.u32(0x6A).u32(0x18).u32(0).u32(3).u32(0).u32(binding + 0x18);
    let sampler = w.pos();
    w.u32(0x6B).zeros(0x14).u32(sampler + 0x1C);
    let sampler_ref = w.pos();
    w.u32(0x6B).zeros(0x14).u32(sampler_ref + 0x1C);
    w.u32(4);

    // 0x03 armature
    let armature = w.pos();
    w.patch_u32(directory_slot(0x03) + 4, armature);
    w.u32(0x03).u32(0x10).u32(1).u32(0).u32(armature + 0x14);
    let bone = w.pos();
    // name Root, no parent, id 0, number 0, attributes at +0x40
    w.u32(0x04).u32(0x40).u32(2).u32(0).zeros(0x0C).i32(0);
    w.zeros(0x0C).i32(0).zeros(4).u32(0).pad_to(bone + 0x40);
    w.u32(bone + 0x48).u32(0);
    let transforms = w.pos();
    w.u32(0x5B).u32(0x14).u32(2).u32(transforms + 0x14).u32(transforms + 0x2C);
    // translation: kind, skip 4, xyz
    w.u32(0x14).u32(0).f32(1.0).f32(2.0).f32(3.0);
    w.zeros(4);
    // Matrix Z: kind, skip 4, axis, degrees
    w.u32(0x5F).u32(0).f32(0.0).f32(0.0).f32(1.0).f32(90.0);
    let surfaces = w.pos();
    w.patch_u32(bone + 0x44, surfaces);
    w.u32(0x4C).u32(0x18).u32(1).zeros(0x0C).u32(surfaces + 0x1C);
    // surface: name body, material skin
    w.u32(0x4D).zeros(8).u32(1).u32(2);

    // 0x0B object mesh
    let object_mesh = w.pos();
    w.patch_u32(directory_slot(0x0B) + 4, object_mesh);
    w.u32(0x0B).u32(0x10).u32(1).u32(object_mesh + 0x10);
    let mesh = w.pos();
    w.u32(0x0A).u32(0x20).u32(2).zeros(0x14).u32(mesh + 0x28).u32(0);

    let vertices = w.pos();
    w.u32(0x59).u32(0x20).u32(1).u16(1).u16(0).u32(3).u32(0x20).u32(0);
    w.u32(vertices + 0x20);
    w.zeros(0x14).u32(vertices + 0x38);
    let colours = [[255; 4], [255; 4], vertex_colour];
    let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
    for (position, colour) in positions.iter().zip(colours) {
        w.f32(position[0]).f32(position[1]).f32(position[2]);
        w.f16(0.0).f16(0.0).f16(1.0);
        w.f16(0.5).zeros(6).f16(0.25);
        w.bytes(&colour);
    }

    let indices = w.pos();
    w.patch_u32(mesh + 0x20, vertices);
    w.patch_u32(mesh + 0x24, indices);
    w.u32(0x46).u32(0x20).u32(1).u32(1).u32(0).u16(0).u16(0);
    w.u32(1).u32(indices + 0x20);
    w.u32(0x45).u32(0).u32(3).u16(0x05).u16(0).u32(0);
    w.u16(0).u16(1).u16(2).u16(0);

    let length = w.pos();
    w.patch_u32(0x10, length);
    w.data
}

/// Absolute offset of the material list in a [`triangle_ism2`] file.
pub fn material_section_offset<B: ByteOrder>(data: &[u8]) -> u32 {
    let slot = directory_slot(0x61) as usize + 4;
    B::read_u32(&data[slot..slot + 4])
}

/// One row of an ARC table.
pub struct ArcRow<'a> {
    pub path_type: u32,
    pub name: &'a str,
    pub offset: u32,
    pub size: u32,
}

pub const ROOT: u32 = 0x0300_0000;
pub const FOLDER: u32 = 0x0200_0000;
pub const FILE: u32 = 0x0400_0000;

/// Build an ARC archive from rows and the payload area they point into.
pub fn arc(rows: &[ArcRow<'_>], payloads: &[u8]) -> Vec<u8> {
    let mut names = Vec::new();
    let mut table = Writer::<BigEndian>::new();
    for (number, row) in rows.iter().enumerate() {
        table
            .u32(row.path_type)
            .u32(u32::try_from(number).unwrap())
            .u32(u32::try_from(names.len()).unwrap())
            .u32(row.size)
            .u32(0)
            .u32(row.offset);
        names.extend_from_slice(row.name.as_bytes());
        names.push(0);
    }

    let mut w = Writer::<BigEndian>::new();
    w.bytes(b"ARC\x02")
        .u32(u32::try_from(rows.len()).unwrap())
        .u32(u32::try_from(table.data.len()).unwrap())
        .u32(u32::try_from(names.len()).unwrap());
    w.bytes(&table.data).bytes(&names).bytes(payloads);
    w.data
}
