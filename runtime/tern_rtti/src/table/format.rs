//! Type formatting for logging and error messages.

use super::TypeTable;
use crate::id::TypeCtorId;
use crate::type_info::TypeInfo;

impl TypeTable {
    /// Format a type as a human-readable string.
    pub fn format_type(&self, ty: &TypeInfo) -> String {
        let mut buf = String::new();
        self.format_type_into(ty, &mut buf);
        buf
    }

    /// Format a type into an existing string buffer.
    pub fn format_type_into(&self, ty: &TypeInfo, buf: &mut String) {
        let args = ty.args();
        match ty.ctor() {
            TypeCtorId::TUPLE => {
                buf.push('{');
                self.format_list(args, buf);
                buf.push('}');
            }
            TypeCtorId::PRED => {
                buf.push_str("pred");
                if !args.is_empty() {
                    buf.push('(');
                    self.format_list(args, buf);
                    buf.push(')');
                }
            }
            TypeCtorId::FUNC => {
                buf.push_str("func");
                if let Some((ret, params)) = args.split_last() {
                    if !params.is_empty() {
                        buf.push('(');
                        self.format_list(params, buf);
                        buf.push(')');
                    }
                    buf.push_str(" = ");
                    self.format_type_into(ret, buf);
                }
            }
            ctor => {
                match self.get(ctor) {
                    Some(desc) if ctor.is_builtin() => buf.push_str(desc.name()),
                    Some(desc) => {
                        buf.push_str(desc.module());
                        buf.push('.');
                        buf.push_str(desc.name());
                    }
                    None => buf.push_str("<unknown>"),
                }
                if !args.is_empty() {
                    buf.push('(');
                    self.format_list(args, buf);
                    buf.push(')');
                }
            }
        }
    }

    fn format_list(&self, types: &[TypeInfo], buf: &mut String) {
        for (i, ty) in types.iter().enumerate() {
            if i > 0 {
                buf.push_str(", ");
            }
            self.format_type_into(ty, buf);
        }
    }
}
