//! Reflection types and GL enum values shared by backends.

/// Raw GL enum values used by reflection and uploads.
pub mod gl {
    pub const BYTE: u32 = 0x1400;
    pub const UNSIGNED_BYTE: u32 = 0x1401;
    pub const SHORT: u32 = 0x1402;
    pub const UNSIGNED_SHORT: u32 = 0x1403;
    pub const INT: u32 = 0x1404;
    pub const UNSIGNED_INT: u32 = 0x1405;
    pub const FLOAT: u32 = 0x1406;

    pub const FLOAT_VEC2: u32 = 0x8B50;
    pub const FLOAT_VEC3: u32 = 0x8B51;
    pub const FLOAT_VEC4: u32 = 0x8B52;
    pub const INT_VEC2: u32 = 0x8B53;
    pub const INT_VEC3: u32 = 0x8B54;
    pub const INT_VEC4: u32 = 0x8B55;
    pub const BOOL: u32 = 0x8B56;
    pub const BOOL_VEC2: u32 = 0x8B57;
    pub const BOOL_VEC3: u32 = 0x8B58;
    pub const BOOL_VEC4: u32 = 0x8B59;
    pub const FLOAT_MAT2: u32 = 0x8B5A;
    pub const FLOAT_MAT3: u32 = 0x8B5B;
    pub const FLOAT_MAT4: u32 = 0x8B5C;

    pub const SAMPLER_2D: u32 = 0x8B5E;
    pub const SAMPLER_3D: u32 = 0x8B5F;
    pub const SAMPLER_CUBE: u32 = 0x8B60;
    pub const SAMPLER_2D_SHADOW: u32 = 0x8B62;
    pub const SAMPLER_CUBE_SHADOW: u32 = 0x8DC5;

    pub const TEXTURE_2D: u32 = 0x0DE1;
    pub const TEXTURE_3D: u32 = 0x806F;
    pub const TEXTURE_CUBE_MAP: u32 = 0x8513;
    pub const TEXTURE0: u32 = 0x84C0;
}

/// Reflected metadata for one active uniform or attribute slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveInfo {
    /// Name as reported by the driver, e.g. `lights[0].color` or `bones[0]`.
    pub name: String,
    /// GL type enum, e.g. [`gl::FLOAT_VEC3`].
    pub ty: u32,
    /// Element count. Only meaningful for pure arrays, 1 otherwise.
    pub size: u32,
}

impl ActiveInfo {
    pub fn new(name: impl Into<String>, ty: u32, size: u32) -> Self {
        Self {
            name: name.into(),
            ty,
            size,
        }
    }
}

/// Uniform types the setter generator knows how to upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformType {
    Float,
    FloatVec2,
    FloatVec3,
    FloatVec4,
    Int,
    IntVec2,
    IntVec3,
    IntVec4,
    Bool,
    BoolVec2,
    BoolVec3,
    BoolVec4,
    FloatMat2,
    FloatMat3,
    FloatMat4,
    Sampler2d,
    Sampler2dShadow,
    SamplerCube,
    SamplerCubeShadow,
    Sampler3d,
}

/// Upload strategy family selected from a [`UniformType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadKind {
    /// `uniform{N}f` / `uniform{N}fv` with N components.
    Float(usize),
    /// `uniform{N}i` / `uniform{N}iv` with N components (ints and bools).
    Int(usize),
    /// `uniformMatrix{N}fv` for an NxN matrix.
    Matrix(usize),
    /// Texture unit index uploaded through `uniform1i` / `uniform1iv`.
    Sampler,
}

impl UniformType {
    /// Map a GL type enum to a supported uniform type.
    pub fn from_gl(ty: u32) -> Option<Self> {
        let ty = match ty {
            gl::FLOAT => Self::Float,
            gl::FLOAT_VEC2 => Self::FloatVec2,
            gl::FLOAT_VEC3 => Self::FloatVec3,
            gl::FLOAT_VEC4 => Self::FloatVec4,
            gl::INT => Self::Int,
            gl::INT_VEC2 => Self::IntVec2,
            gl::INT_VEC3 => Self::IntVec3,
            gl::INT_VEC4 => Self::IntVec4,
            gl::BOOL => Self::Bool,
            gl::BOOL_VEC2 => Self::BoolVec2,
            gl::BOOL_VEC3 => Self::BoolVec3,
            gl::BOOL_VEC4 => Self::BoolVec4,
            gl::FLOAT_MAT2 => Self::FloatMat2,
            gl::FLOAT_MAT3 => Self::FloatMat3,
            gl::FLOAT_MAT4 => Self::FloatMat4,
            gl::SAMPLER_2D => Self::Sampler2d,
            gl::SAMPLER_2D_SHADOW => Self::Sampler2dShadow,
            gl::SAMPLER_CUBE => Self::SamplerCube,
            gl::SAMPLER_CUBE_SHADOW => Self::SamplerCubeShadow,
            gl::SAMPLER_3D => Self::Sampler3d,
            _ => return None,
        };
        Some(ty)
    }

    /// The GL enum value for this type.
    pub fn to_gl(self) -> u32 {
        match self {
            Self::Float => gl::FLOAT,
            Self::FloatVec2 => gl::FLOAT_VEC2,
            Self::FloatVec3 => gl::FLOAT_VEC3,
            Self::FloatVec4 => gl::FLOAT_VEC4,
            Self::Int => gl::INT,
            Self::IntVec2 => gl::INT_VEC2,
            Self::IntVec3 => gl::INT_VEC3,
            Self::IntVec4 => gl::INT_VEC4,
            Self::Bool => gl::BOOL,
            Self::BoolVec2 => gl::BOOL_VEC2,
            Self::BoolVec3 => gl::BOOL_VEC3,
            Self::BoolVec4 => gl::BOOL_VEC4,
            Self::FloatMat2 => gl::FLOAT_MAT2,
            Self::FloatMat3 => gl::FLOAT_MAT3,
            Self::FloatMat4 => gl::FLOAT_MAT4,
            Self::Sampler2d => gl::SAMPLER_2D,
            Self::Sampler2dShadow => gl::SAMPLER_2D_SHADOW,
            Self::SamplerCube => gl::SAMPLER_CUBE,
            Self::SamplerCubeShadow => gl::SAMPLER_CUBE_SHADOW,
            Self::Sampler3d => gl::SAMPLER_3D,
        }
    }

    pub fn upload_kind(self) -> UploadKind {
        match self {
            Self::Float => UploadKind::Float(1),
            Self::FloatVec2 => UploadKind::Float(2),
            Self::FloatVec3 => UploadKind::Float(3),
            Self::FloatVec4 => UploadKind::Float(4),
            Self::Int | Self::Bool => UploadKind::Int(1),
            Self::IntVec2 | Self::BoolVec2 => UploadKind::Int(2),
            Self::IntVec3 | Self::BoolVec3 => UploadKind::Int(3),
            Self::IntVec4 | Self::BoolVec4 => UploadKind::Int(4),
            Self::FloatMat2 => UploadKind::Matrix(2),
            Self::FloatMat3 => UploadKind::Matrix(3),
            Self::FloatMat4 => UploadKind::Matrix(4),
            Self::Sampler2d
            | Self::Sampler2dShadow
            | Self::SamplerCube
            | Self::SamplerCubeShadow
            | Self::Sampler3d => UploadKind::Sampler,
        }
    }

    /// Number of scalar components in one element of this type.
    pub fn components(self) -> usize {
        match self.upload_kind() {
            UploadKind::Float(n) | UploadKind::Int(n) => n,
            UploadKind::Matrix(n) => n * n,
            UploadKind::Sampler => 1,
        }
    }

    pub fn is_sampler(self) -> bool {
        self.upload_kind() == UploadKind::Sampler
    }
}

/// Texture binding targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureTarget {
    Texture2d,
    TextureCubeMap,
    Texture3d,
}

impl TextureTarget {
    pub fn to_gl(self) -> u32 {
        match self {
            Self::Texture2d => gl::TEXTURE_2D,
            Self::TextureCubeMap => gl::TEXTURE_CUBE_MAP,
            Self::Texture3d => gl::TEXTURE_3D,
        }
    }
}
